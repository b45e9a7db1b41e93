use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tracker::TrackLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::date::{parse_date_strict, today};
use crate::utils::formatting::{bold, secs2readable};
use crate::utils::table::Table;

const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Times { user_id, date } = cmd {
        let day = match date {
            Some(d) => parse_date_strict(d)?,
            None => today(),
        };

        let mut pool = DbPool::open_initialized(cfg.database_path())?;
        let times = TrackLogic::times(&mut pool, *user_id, day)?;

        if times.is_empty() {
            info(format!("No tasks for user {} on {}", user_id, day));
            return Ok(());
        }

        let mut table = Table::new(vec!["id", "start", "end", "spent"]);
        let mut total = 0.0;

        for t in &times {
            let end = t
                .task
                .end_time
                .map(|e| e.format(TS_FMT).to_string())
                .unwrap_or_else(|| "running".to_string());

            table.add_row(vec![
                t.task.id.to_string(),
                t.task.start_time.format(TS_FMT).to_string(),
                end,
                secs2readable(t.time_spent),
            ]);
            total += t.time_spent;
        }

        println!("{}\n", bold(&format!("User {} on {}", user_id, day)));
        print!("{}", table.render());
        println!("\nTotal: {}", secs2readable(total));
    }

    Ok(())
}
