use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use sim_runtime::Response;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

mod render;

#[derive(Parser, Debug)]
#[command(author, version, about = "Circle map command client", long_about = None)]
struct Cli {
    /// Address of the simulation command port.
    #[arg(long, default_value = "127.0.0.1:41010")]
    endpoint: String,
    /// Print the raw response line instead of rendering it.
    #[arg(long)]
    raw: bool,
    /// Seconds to wait for the connection.
    #[arg(long, default_value_t = 5)]
    connect_timeout: u64,
    /// Command to send, e.g. `epoch 1 3`. Reads commands from stdin when omitted.
    command: Vec<String>,
}

struct Connection {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(endpoint: &str, timeout: Duration) -> Result<Self> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(endpoint))
            .await
            .map_err(|_| eyre!("timed out connecting to {endpoint}"))?
            .wrap_err_with(|| format!("failed to connect to {endpoint}"))?;
        let (reader, writer) = stream.into_split();
        info!(%endpoint, "inspector.connected");
        Ok(Self {
            lines: BufReader::new(reader).lines(),
            writer,
        })
    }

    async fn request(&mut self, line: &str) -> Result<String> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        debug!(command = line, "command.sent");
        self.lines
            .next_line()
            .await?
            .ok_or_else(|| eyre!("server closed the connection"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut connection =
        Connection::open(&cli.endpoint, Duration::from_secs(cli.connect_timeout)).await?;

    if !cli.command.is_empty() {
        let line = cli.command.join(" ");
        let reply = connection.request(&line).await?;
        print_reply(&reply, cli.raw);
        return Ok(());
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = stdin.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let reply = connection.request(line).await?;
        print_reply(&reply, cli.raw);
    }
    Ok(())
}

fn print_reply(reply: &str, raw: bool) {
    if raw {
        println!("{reply}");
        return;
    }
    match serde_json::from_str::<Response>(reply) {
        Ok(response) => println!("{}", render::render_response(&response)),
        Err(err) => {
            warn!(error = %err, "response.undecodable");
            println!("{reply}");
        }
    }
}
