use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::analytics::{self, RoiStatus};
use crate::cli::current_month;
use crate::fmt::{money, month_label, percent, roi};
use crate::store::{load_state, state_path};

pub fn summary(data_dir: &Path) -> anyhow::Result<()> {
    let state = load_state(&state_path(data_dir));
    let analytics = analytics::compute(&state, &current_month());

    println!("Portfolio Summary");
    println!("  Lifetime revenue:  {}", money(analytics.lifetime_revenue));
    println!("  This month:        {}", money(analytics.current_month_revenue));
    println!("  Total investment:  {}", money(analytics.total_investment));
    let profit = money(analytics.total_profit);
    let profit = if analytics.total_profit >= 0.0 {
        profit.green()
    } else {
        profit.red()
    };
    println!("  Profit:            {profit}");
    println!("  Portfolio ROI:     {}", percent(analytics.portfolio_roi));
    println!("  Best book:         {}", analytics.best_book.as_deref().unwrap_or("-"));
    println!("  Best niche:        {}", analytics.best_niche.as_deref().unwrap_or("-"));

    println!("\nSuggestions");
    for tip in analytics::insights(&state, &analytics) {
        println!("  \u{2022} {tip}");
    }
    Ok(())
}

pub fn roi_report(data_dir: &Path) -> anyhow::Result<()> {
    let state = load_state(&state_path(data_dir));
    let rows = analytics::roi_table(&state);
    if rows.is_empty() {
        println!("No books yet. Add one with `folio books add <title>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Title", "Investment", "Revenue", "Profit", "ROI", "Status"]);
    for row in &rows {
        let status = match row.status {
            RoiStatus::Profitable => row.status.label().green(),
            RoiStatus::Close => row.status.label().yellow(),
            RoiStatus::NotProfitable => row.status.label().red(),
        };
        table.add_row(vec![
            Cell::new(&row.title),
            Cell::new(money(row.investment)),
            Cell::new(money(row.revenue)),
            Cell::new(money(row.profit)),
            Cell::new(roi(row.roi)),
            Cell::new(status),
        ]);
    }
    println!("Book ROI\n{table}");
    Ok(())
}

pub fn months(data_dir: &Path) -> anyhow::Result<()> {
    let state = load_state(&state_path(data_dir));
    let analytics = analytics::compute(&state, &current_month());
    if analytics.monthly_revenue.is_empty() {
        println!("No sales yet. Import a report with `folio import <file>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Month", "Revenue"]);
    for (month, revenue) in &analytics.monthly_revenue {
        table.add_row(vec![Cell::new(month_label(month)), Cell::new(money(*revenue))]);
    }
    println!("Monthly Revenue\n{table}");
    Ok(())
}

pub fn niches(data_dir: &Path) -> anyhow::Result<()> {
    let state = load_state(&state_path(data_dir));
    let analytics = analytics::compute(&state, &current_month());
    if analytics.niche_revenue.is_empty() {
        println!("No sales yet. Import a report with `folio import <file>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Niche", "Revenue", "Share"]);
    for (niche, revenue) in &analytics.niche_revenue {
        let share = if analytics.lifetime_revenue != 0.0 {
            percent(revenue / analytics.lifetime_revenue * 100.0)
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            Cell::new(niche),
            Cell::new(money(*revenue)),
            Cell::new(share),
        ]);
    }
    println!("Revenue by Niche\n{table}");
    Ok(())
}
