//! Text rendering of server responses.

use std::fmt::Write;

use sim_runtime::{CellView, MapSummary, PlayerView, Response, ResponseBody, ViewZone};

pub fn render_response(response: &Response) -> String {
    match response {
        Response::Error { kind, message } => format!("error[{}]: {message}", kind.as_str()),
        Response::Ok(body) => render_body(body),
    }
}

fn render_body(body: &ResponseBody) -> String {
    match body {
        ResponseBody::MapCreated(summary) => {
            let mut out = format!("created {}\n", summary_line(summary));
            for circle in &summary.circles {
                let _ = writeln!(
                    out,
                    "  {} at ({}, {}) r={}",
                    circle.kind, circle.x, circle.y, circle.radius
                );
            }
            out.trim_end().to_string()
        }
        ResponseBody::Maps { maps } if maps.is_empty() => "no maps".to_string(),
        ResponseBody::Maps { maps } => maps
            .iter()
            .map(summary_line)
            .collect::<Vec<_>>()
            .join("\n"),
        ResponseBody::Distributed {
            map_id,
            total_tokens,
            fingerprint,
            ..
        } => format!("map {map_id} seeded with {total_tokens} tokens (fingerprint {fingerprint:016x})"),
        ResponseBody::SpeedsSet { map_id, speeds } => {
            format!("map {map_id} speeds {:?}", speeds.as_slice())
        }
        ResponseBody::Epoch(report) => format!(
            "map {} epoch {} (+{}): moved {} blocked {} stayed {} tokens {} fingerprint {:016x}",
            report.map_id,
            report.epoch,
            report.steps,
            report.stats.moved,
            report.stats.blocked,
            report.stats.stayed,
            report.total_tokens,
            report.fingerprint
        ),
        ResponseBody::Map {
            summary,
            rows,
            players,
            ..
        } => {
            let mut out = summary_line(summary);
            for row in rows {
                out.push('\n');
                out.push_str(row);
            }
            for player in players {
                let _ = write!(
                    out,
                    "\n  player {} '{}' at {}",
                    player.id,
                    player.name,
                    player.position()
                );
            }
            out
        }
        ResponseBody::Player { player } => format!(
            "player {} '{}' on map {} at {}",
            player.id,
            player.name,
            player.map_id,
            player.position()
        ),
        ResponseBody::View(view) => render_view(view),
    }
}

fn summary_line(summary: &MapSummary) -> String {
    format!(
        "map {} '{}' {}x{} circles={} epoch={}{}",
        summary.id,
        summary.name,
        summary.config.width,
        summary.config.height,
        summary.circles.len(),
        summary.epoch,
        if summary.seeded { " seeded" } else { "" }
    )
}

/// Grid of a player's surroundings. `P` marks the player, `#` lies off the map.
pub fn render_view(view: &PlayerView) -> String {
    let mut out = format!(
        "player {} at {} (radius {})",
        view.player.id,
        view.player.position(),
        view.radius
    );
    for row in &view.cells {
        out.push('\n');
        out.extend(row.iter().map(cell_glyph));
    }
    out
}

fn cell_glyph(cell: &CellView) -> char {
    if cell.is_player {
        return 'P';
    }
    match (cell.zone, cell.tokens.len()) {
        (ViewZone::Outside, _) => '#',
        (ViewZone::Center, _) => '@',
        (_, n @ 1..=9) => char::from_digit(n as u32, 10).unwrap_or('+'),
        (_, n) if n > 9 => '+',
        (ViewZone::Interior, _) => 'o',
        _ => '.',
    }
}
