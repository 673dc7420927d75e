use crossterm::style::Stylize;
use grid_core::metadata::ProfileRecord;
use grid_core::ConnectionState;

/// One status line per published state.
pub fn render_state(state: &ConnectionState) -> String {
    let status = if state.connected {
        "connected".green().to_string()
    } else {
        "disconnected".red().to_string()
    };
    let target = state
        .target_address()
        .map_or_else(|| "-".to_string(), |a| a.short());
    let mut line = format!(
        "[{}] chain {} | {} local / {} context | target {}",
        status,
        state.chain_id,
        state.accounts.len(),
        state.context_accounts.len(),
        target
    );
    if state.searching {
        line.push_str(" | searching…");
    }
    line
}

pub fn render_profile(record: &ProfileRecord) -> String {
    let field = |value: &str| {
        if value.is_empty() {
            "(none)".dark_grey().to_string()
        } else {
            value.to_string()
        }
    };
    format!(
        "{}\n  avatar:     {}\n  background: {}",
        record.display_name.as_str().bold(),
        field(&record.avatar_url),
        field(&record.background_url)
    )
}
