//! Entry point for the APS Gantt TUI.

use std::path::PathBuf;

use aps_gantt_tui::{App, TuiError, TuiResult};
use aps_timeline::GanttConfig;

const USAGE: &str = "usage: apsg-tui <schedule.json> [step-minutes]";

fn main() -> TuiResult<()> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| TuiError::Usage(USAGE.to_string()))?;

    let mut config = GanttConfig::new();
    if let Some(step) = args.next() {
        let minutes = step
            .parse()
            .map_err(|_| TuiError::Usage(format!("invalid step '{step}'\n{USAGE}")))?;
        config = config.with_step_minutes(minutes);
    }

    let mut app = App::new(&path, config)?;
    app.run()
}
