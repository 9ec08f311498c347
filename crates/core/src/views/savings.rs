use chrono::{Datelike, NaiveDate};

use super::selection::{SelectionCoordinator, SelectionEffects};
use crate::models::chart::SavingsBar;
use crate::models::evolution::RangeReturn;
use crate::models::month::month_short;
use crate::models::range::MonthRange;
use crate::models::savings::{
    ClientStats, MonthComment, MonthlySavingsPoint, MonthlySavingsResponse, WindowSummary, YearGroup,
};
use crate::services::analytics_service::AnalyticsService;
use crate::services::chart_service::ChartService;
use crate::services::range_service::RangeService;
use crate::services::savings_service::SavingsService;

const HISTORY_TITLE: &str = "Histórico completo";
const NORMALIZED_SUFFIX: &str = " · sin outliers";

/// State of the monthly savings page.
///
/// Holds the full series plus the user's choices (range, normalize,
/// selection). Window, stats, year groups and bars are derived on every call
/// from those inputs only.
#[derive(Debug, Clone)]
pub struct SavingsPage {
    months: Vec<MonthlySavingsPoint>,
    range: MonthRange,
    normalize: bool,
    today: NaiveDate,
    selection: SelectionCoordinator,
}

impl SavingsPage {
    /// Page over `months` with the default range (`1A`) as of `today`.
    pub fn new(mut months: Vec<MonthlySavingsPoint>, today: NaiveDate) -> Self {
        months.sort_by(|a, b| a.month.cmp(&b.month));
        months.dedup_by(|a, b| a.month == b.month);

        let mut page = Self {
            months,
            range: MonthRange::default(),
            normalize: false,
            today,
            selection: SelectionCoordinator::new(),
        };
        page.reset_selection_window();
        page
    }

    pub fn from_response(response: MonthlySavingsResponse, today: NaiveDate) -> Self {
        Self::new(response.months, today)
    }

    /// Every month received, ascending.
    pub fn months(&self) -> &[MonthlySavingsPoint] {
        &self.months
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_year(&self) -> i32 {
        self.today.year()
    }

    // ── Range & normalize ───────────────────────────────────────────

    pub fn range(&self) -> MonthRange {
        self.range
    }

    /// Switch range. The default collapsed years are recomputed for the
    /// new window; the selection is kept.
    pub fn set_range(&mut self, range: MonthRange) {
        if self.range == range {
            return;
        }
        self.range = range;
        self.reset_selection_window();
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize;
    }

    /// Whether the "sin outliers" toggle would change the average.
    pub fn can_normalize(&self) -> bool {
        let count = self
            .window()
            .iter()
            .filter(|m| m.real_savings_value().is_some())
            .count();
        SavingsService::new().can_normalize(count)
    }

    pub fn groups_by_year(&self) -> bool {
        self.range.groups_by_year()
    }

    // ── Derived ─────────────────────────────────────────────────────

    /// Months inside the selected range, ascending.
    pub fn window(&self) -> &[MonthlySavingsPoint] {
        window_of(&self.months, self.range, self.today)
    }

    pub fn stats(&self) -> Option<ClientStats> {
        SavingsService::new().compute_stats(self.window(), self.normalize)
    }

    /// Table rows, newest first.
    pub fn rows(&self) -> Vec<&MonthlySavingsPoint> {
        self.window().iter().rev().collect()
    }

    pub fn year_groups(&self) -> Vec<YearGroup> {
        SavingsService::new().group_by_year(self.window(), self.current_year())
    }

    pub fn bars(&self) -> Vec<SavingsBar> {
        ChartService::new().savings_bars(self.window(), self.selection.selected_month())
    }

    pub fn bar_min_width(&self) -> usize {
        ChartService::new().bar_min_width(&self.bars())
    }

    /// Label every n-th bar on long windows.
    pub fn month_label_interval(&self) -> Option<usize> {
        ChartService::new().month_label_interval(&self.bars())
    }

    /// Change of the end-of-month cash balance across the window.
    pub fn cash_return(&self) -> RangeReturn {
        AnalyticsService::new().range_return(self.window())
    }

    pub fn window_summary(&self) -> Option<WindowSummary> {
        SavingsService::new().window_summary(self.window())
    }

    /// "Mostrando 12 meses · Ene 2024 – Dic 2024"; `None` for an empty window.
    pub fn window_caption(&self) -> Option<String> {
        let summary = self.window_summary()?;
        let unit = if summary.count == 1 { "mes" } else { "meses" };
        Some(format!(
            "Mostrando {} {unit} · {} – {}",
            summary.count,
            month_short(&summary.first_month),
            month_short(&summary.last_month),
        ))
    }

    /// Subtitle of the average card; `None` when there are no stats.
    pub fn average_subtitle(&self) -> Option<String> {
        let stats = self.stats()?;
        let suffix = if stats.is_normalized { NORMALIZED_SUFFIX } else { "" };
        Some(format!("{}{suffix}", self.range.description()))
    }

    pub fn table_title(&self) -> &'static str {
        match self.range {
            MonthRange::Max => HISTORY_TITLE,
            other => other.description(),
        }
    }

    // ── Selection ───────────────────────────────────────────────────

    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    pub fn selected_month(&self) -> Option<&str> {
        self.selection.selected_month()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection(self.window())
    }

    /// Bar click in the chart (toggle, scroll the table into view).
    pub fn select_from_chart(&mut self, month: &str) -> SelectionEffects {
        self.selection.select_from_chart(month)
    }

    /// Row or card click in the table.
    pub fn click_row(&mut self, month: &str) -> SelectionEffects {
        let window = window_of(&self.months, self.range, self.today);
        self.selection.click_row(month, window)
    }

    pub fn take_scroll_request(&mut self) -> bool {
        self.selection.take_scroll_request()
    }

    pub fn is_collapsed(&self, year: &str) -> bool {
        self.selection.is_collapsed(year)
    }

    pub fn toggle_year(&mut self, year: &str) {
        self.selection.toggle_year(year);
    }

    pub fn drawer_comments(&self) -> &[MonthComment] {
        self.selection.drawer_comments(self.window())
    }

    pub fn close_drawer(&mut self) {
        self.selection.close_drawer();
    }

    fn reset_selection_window(&mut self) {
        let window = window_of(&self.months, self.range, self.today);
        let current_year = self.today.year();
        self.selection
            .reset_window(window, self.range.groups_by_year(), current_year);
    }
}

fn window_of(months: &[MonthlySavingsPoint], range: MonthRange, today: NaiveDate) -> &[MonthlySavingsPoint] {
    RangeService::new().filter_months(months, range, today)
}
