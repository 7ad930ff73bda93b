//! Export messages to one CSV file per day
//!
//! Usage: export_messages <start YYYY-MM-DD> <end YYYY-MM-DD> [output dir]
//!
//! Each day in `[start, end)` is fetched with `since`/`before` filters, every
//! page is followed, and the rows are written to `messages_<date>.csv`.

use mainstay_sdk::{daily_windows, logging, ClientBuilder, MessageFilters, Record, Table};
use std::path::PathBuf;
use time::macros::format_description;
use time::Date;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("mainstay_sdk=info,export_messages=info")?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <start> <end> [output dir]", args[0]);
        std::process::exit(2);
    }

    let format = format_description!("[year]-[month]-[day]");
    let start = Date::parse(&args[1], &format)?;
    let end = Date::parse(&args[2], &format)?;
    let out_dir = PathBuf::from(args.get(3).map(String::as_str).unwrap_or("."));

    let client = ClientBuilder::from_env()?.build()?;

    for window in daily_windows(start, end)? {
        let mut records: Vec<Record> = Vec::new();
        let mut page = client.get_messages(&MessageFilters::default().window(&window))?;
        loop {
            records.append(&mut page.results);
            match client.next_page(&page)? {
                Some(next) => page = next,
                None => break,
            }
        }

        let day = &window.since[..10];
        let path = out_dir.join(format!("messages_{}.csv", day));
        let table = Table::from_records(&records);
        table.save_csv(&path)?;
        tracing::info!(day, rows = table.len(), path = %path.display(), "Exported messages");
    }

    Ok(())
}
