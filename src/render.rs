//! Terminal table renderer.
//!
//! Clears the screen and prints one row per target with min/avg/max
//! duration and size plus the success ratio. Targets with no results yet
//! are skipped.

use crate::stats::StatsMap;

pub fn render_table(stats_map: &StatsMap) {
    let mut urls: Vec<&String> = stats_map.keys().collect();
    urls.sort();

    let longest = urls.iter().map(|u| u.len()).max().unwrap_or(0);

    // Clear console and move the cursor home.
    print!("\x1b[2J\x1b[H");

    let pad = " ".repeat((longest + 1) / 2);
    println!("┌{}┐", "-".repeat(longest + 60));
    println!(
        "| {pad}URL{pad} Duration (ms)            Size (≈KiB)             OK   |"
    );
    println!("├{}┤", "-".repeat(longest + 60));

    for url in urls {
        let Some(report) = stats_map[url].report() else {
            continue;
        };

        println!(
            "| {:<width$}  {:>4} / {:>4} / {:>4}      {:>4} / {:>4} / {:>4}       {:>3}/{:>3} |",
            url,
            report.min_duration.as_millis(),
            report.avg_duration.as_millis(),
            report.max_duration.as_millis(),
            report.min_size,
            report.avg_size,
            report.max_size,
            report.success,
            report.total,
            width = longest,
        );
    }

    println!("└{}┘", "-".repeat(longest + 60));
}
