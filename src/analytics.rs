//! Portfolio analytics over the catalog and ledger.
//!
//! Everything here is pure: functions read [`AppState`] and return plain
//! report structs, and the caller supplies the current month key so output
//! never depends on the wall clock.

use std::collections::{BTreeSet, HashMap};

use crate::models::{AppState, Book};

/// Books shown in the top-books breakdown.
const TOP_BOOKS: usize = 15;

/// Revenue share above which one book counts as carrying the portfolio.
const CONCENTRATION_SHARE: f64 = 0.4;

fn niche_label(book: Option<&&Book>) -> String {
    match book {
        Some(b) if !b.niche.is_empty() => b.niche.clone(),
        _ => "Uncategorized".to_string(),
    }
}

fn title_label(book: Option<&&Book>) -> String {
    match book {
        Some(b) => b.title.clone(),
        None => "Unknown".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Analytics {
    pub lifetime_revenue: f64,
    pub current_month_revenue: f64,
    pub total_investment: f64,
    pub total_profit: f64,
    /// Portfolio ROI in percent; zero when nothing was invested.
    pub portfolio_roi: f64,
    pub best_book: Option<String>,
    pub best_niche: Option<String>,
    /// Revenue per book id, in ledger first-appearance order.
    pub revenue_by_book: Vec<(String, f64)>,
    /// Revenue per month key, ascending by month.
    pub monthly_revenue: Vec<(String, f64)>,
    /// Best-earning titles, descending, at most [`TOP_BOOKS`].
    pub top_books: Vec<(String, f64)>,
    /// Revenue per niche, descending.
    pub niche_revenue: Vec<(String, f64)>,
}

pub fn compute(state: &AppState, current_month: &str) -> Analytics {
    let books_by_id: HashMap<&str, &Book> =
        state.books.iter().map(|b| (b.id.as_str(), b)).collect();

    let mut revenue_by_book: Vec<(String, f64)> = Vec::new();
    let mut book_index: HashMap<&str, usize> = HashMap::new();
    for sale in &state.sales {
        if let Some(&i) = book_index.get(sale.book_id.as_str()) {
            revenue_by_book[i].1 += sale.royalty;
        } else {
            book_index.insert(&sale.book_id, revenue_by_book.len());
            revenue_by_book.push((sale.book_id.clone(), sale.royalty));
        }
    }

    let lifetime_revenue: f64 = revenue_by_book.iter().map(|(_, v)| v).sum();
    let total_investment: f64 = state.books.iter().map(|b| b.total_cost()).sum();
    let total_profit = lifetime_revenue - total_investment;
    let portfolio_roi = if total_investment > 0.0 {
        total_profit / total_investment * 100.0
    } else {
        0.0
    };
    let current_month_revenue: f64 = state
        .sales
        .iter()
        .filter(|s| s.month == current_month)
        .map(|s| s.royalty)
        .sum();

    let mut best_book = None;
    let mut best_revenue = -1.0_f64;
    for (book_id, revenue) in &revenue_by_book {
        if *revenue > best_revenue {
            best_revenue = *revenue;
            best_book = Some(title_label(books_by_id.get(book_id.as_str())));
        }
    }

    let mut niche_revenue: Vec<(String, f64)> = Vec::new();
    let mut niche_index: HashMap<String, usize> = HashMap::new();
    for (book_id, revenue) in &revenue_by_book {
        let niche = niche_label(books_by_id.get(book_id.as_str()));
        if let Some(&i) = niche_index.get(&niche) {
            niche_revenue[i].1 += revenue;
        } else {
            niche_index.insert(niche.clone(), niche_revenue.len());
            niche_revenue.push((niche, *revenue));
        }
    }
    niche_revenue.sort_by(|a, b| b.1.total_cmp(&a.1));
    let best_niche = niche_revenue.first().map(|(name, _)| name.clone());

    let mut monthly_revenue: Vec<(String, f64)> = Vec::new();
    let mut month_index: HashMap<&str, usize> = HashMap::new();
    for sale in &state.sales {
        if let Some(&i) = month_index.get(sale.month.as_str()) {
            monthly_revenue[i].1 += sale.royalty;
        } else {
            month_index.insert(&sale.month, monthly_revenue.len());
            monthly_revenue.push((sale.month.clone(), sale.royalty));
        }
    }
    monthly_revenue.sort_by(|a, b| a.0.cmp(&b.0));

    let mut top_books: Vec<(String, f64)> = revenue_by_book
        .iter()
        .map(|(book_id, revenue)| (title_label(books_by_id.get(book_id.as_str())), *revenue))
        .collect();
    top_books.sort_by(|a, b| b.1.total_cmp(&a.1));
    top_books.truncate(TOP_BOOKS);

    Analytics {
        lifetime_revenue,
        current_month_revenue,
        total_investment,
        total_profit,
        portfolio_roi,
        best_book,
        best_niche,
        revenue_by_book,
        monthly_revenue,
        top_books,
        niche_revenue,
    }
}

// ---------------------------------------------------------------------------
// Per-book ROI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiStatus {
    Profitable,
    /// Earning but not yet past its costs.
    Close,
    NotProfitable,
}

impl RoiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RoiStatus::Profitable => "Profitable",
            RoiStatus::Close => "Close",
            RoiStatus::NotProfitable => "Not Profitable",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoiRow {
    pub title: String,
    pub investment: f64,
    pub revenue: f64,
    pub profit: f64,
    /// Percent ROI. `None` means revenue with zero investment, where the
    /// ratio is undefined; a costless book with no revenue reads 0%.
    pub roi: Option<f64>,
    pub status: RoiStatus,
}

/// One row per catalog book, sorted by profit descending. Ties keep
/// catalog order.
pub fn roi_table(state: &AppState) -> Vec<RoiRow> {
    let mut revenue_by_book: HashMap<&str, f64> = HashMap::new();
    for sale in &state.sales {
        *revenue_by_book.entry(sale.book_id.as_str()).or_default() += sale.royalty;
    }

    let mut rows: Vec<RoiRow> = state
        .books
        .iter()
        .map(|book| {
            let investment = book.total_cost();
            let revenue = revenue_by_book.get(book.id.as_str()).copied().unwrap_or(0.0);
            let profit = revenue - investment;
            let roi = if investment > 0.0 {
                Some(profit / investment * 100.0)
            } else if revenue > 0.0 {
                None
            } else {
                Some(0.0)
            };
            let status = if profit > 0.0 {
                RoiStatus::Profitable
            } else if revenue > 0.0 {
                RoiStatus::Close
            } else {
                RoiStatus::NotProfitable
            };
            RoiRow {
                title: book.title.clone(),
                investment,
                revenue,
                profit,
                roi,
                status,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    rows
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// Heuristic suggestions, in a fixed order: revenue concentration, stale
/// books, a dominant niche, then momentum. Falls back to a single generic
/// nudge when nothing triggers.
pub fn insights(state: &AppState, analytics: &Analytics) -> Vec<String> {
    let mut out = Vec::new();
    let books_by_id: HashMap<&str, &Book> =
        state.books.iter().map(|b| (b.id.as_str(), b)).collect();

    if analytics.lifetime_revenue > 0.0 {
        let mut shares = analytics.revenue_by_book.clone();
        shares.sort_by(|a, b| b.1.total_cmp(&a.1));
        if let Some((book_id, revenue)) = shares.first() {
            let share = revenue / analytics.lifetime_revenue;
            if share > CONCENTRATION_SHARE {
                out.push(format!(
                    "\"{}\" drives {:.1}% of revenue. Focus upcoming books in this direction.",
                    title_label(books_by_id.get(book_id.as_str())),
                    share * 100.0
                ));
            }
        }
    }

    let months: Vec<&str> = state
        .sales
        .iter()
        .map(|s| s.month.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if months.len() >= 3 {
        let recent = &months[months.len() - 3..];
        let mut by_book_month: HashMap<(&str, &str), f64> = HashMap::new();
        for sale in &state.sales {
            *by_book_month
                .entry((sale.book_id.as_str(), sale.month.as_str()))
                .or_default() += sale.royalty;
        }
        for book in &state.books {
            let recent_total: f64 = recent
                .iter()
                .map(|month| {
                    by_book_month
                        .get(&(book.id.as_str(), *month))
                        .copied()
                        .unwrap_or(0.0)
                })
                .sum();
            if recent_total == 0.0 {
                out.push(format!(
                    "\"{}\" has zero sales over the last 3 months. Update listing, keywords, and cover.",
                    book.title
                ));
            }
        }
    }

    if analytics.niche_revenue.len() >= 2 {
        let (top_name, top) = &analytics.niche_revenue[0];
        let runner_up = analytics.niche_revenue[1].1;
        if *top >= runner_up * 2.0 && *top > 0.0 {
            out.push(format!(
                "Niche leader \"{top_name}\" is outperforming others by 2x+. Prioritize this niche for next launches."
            ));
        }
    }

    if analytics.monthly_revenue.len() >= 3 {
        let window = &analytics.monthly_revenue[analytics.monthly_revenue.len() - 3..];
        if window[2].1 > window[1].1 && window[1].1 > window[0].1 {
            out.push(
                "Portfolio revenue is rising for 3 consecutive months. You have momentum; increase publishing cadence."
                    .to_string(),
            );
        }
    }

    if out.is_empty() {
        out.push(
            "Import another month of sales data to unlock stronger trend-based recommendations."
                .to_string(),
        );
    }
    out
}
