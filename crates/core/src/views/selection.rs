use std::collections::BTreeSet;

use crate::models::month::year_of;
use crate::models::savings::{MonthComment, MonthlySavingsPoint};
use crate::services::chart_service::ChartService;
use crate::services::savings_service::SavingsService;

/// Where a selection change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// A bar of the savings chart (toggles, scrolls the table into view)
    Chart,
    /// A row or card of the savings table (sets, the table is already visible)
    Table,
}

/// Side effects of a selection change, for the renderer to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionEffects {
    /// Year group that was collapsed and got expanded
    pub expanded_year: Option<String>,
    /// A smooth scroll of the table was queued for the next frame
    pub scroll_requested: bool,
    /// The comments drawer was opened for this month
    pub drawer_opened: Option<String>,
}

/// Single source of truth for the month selected across chart and table.
///
/// Owns the selected month, the collapsed year groups and the comments
/// drawer. Chart and table never hold their own copy; they read from here
/// and report interactions back.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    selected_month: Option<String>,
    group_by_year: bool,
    collapsed_years: BTreeSet<String>,
    scroll_pending: bool,
    drawer_month: Option<String>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_month(&self) -> Option<&str> {
        self.selected_month.as_deref()
    }

    pub fn is_selected(&self, month: &str) -> bool {
        self.selected_month.as_deref() == Some(month)
    }

    /// Highlighting is active only if the selection is inside the window.
    pub fn has_selection(&self, window: &[MonthlySavingsPoint]) -> bool {
        ChartService::new().has_selection(window, self.selected_month())
    }

    /// Chart bar click: selecting the selected month clears the selection.
    pub fn select_from_chart(&mut self, month: &str) -> SelectionEffects {
        let next = if self.is_selected(month) {
            None
        } else {
            Some(month.to_string())
        };
        self.set_selection(next, SelectionOrigin::Chart)
    }

    /// Set the selection directly. A non-null change expands its year when
    /// collapsed and, for chart-originated changes, queues one scroll.
    pub fn set_selection(&mut self, month: Option<String>, origin: SelectionOrigin) -> SelectionEffects {
        let mut effects = SelectionEffects::default();
        if self.selected_month == month {
            return effects;
        }
        self.selected_month = month;

        let Some(selected) = self.selected_month.as_deref() else {
            return effects;
        };

        if self.group_by_year {
            let year = year_of(selected);
            if self.collapsed_years.remove(year) {
                effects.expanded_year = Some(year.to_string());
            }
        }

        if origin == SelectionOrigin::Chart {
            self.scroll_pending = true;
            effects.scroll_requested = true;
        }

        effects
    }

    pub fn clear_selection(&mut self) {
        self.selected_month = None;
    }

    /// Table row / card click. Always registers the selection; opens the
    /// comments drawer only when the month has comments.
    pub fn click_row(&mut self, month: &str, window: &[MonthlySavingsPoint]) -> SelectionEffects {
        let has_comments = window
            .iter()
            .find(|m| m.month == month)
            .is_some_and(MonthlySavingsPoint::has_comments);

        let mut effects = self.set_selection(Some(month.to_string()), SelectionOrigin::Table);
        if has_comments {
            self.drawer_month = Some(month.to_string());
            effects.drawer_opened = Some(month.to_string());
        }
        effects
    }

    /// Consume the queued scroll. Called by the renderer on the next
    /// animation frame, once layout has settled; true at most once per request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    // ── Year groups ─────────────────────────────────────────────────

    /// Recompute the default collapsed years for a new window: when grouping,
    /// every year but the current one starts collapsed.
    pub fn reset_window(&mut self, window: &[MonthlySavingsPoint], group_by_year: bool, current_year: i32) {
        self.group_by_year = group_by_year;
        if !group_by_year {
            self.collapsed_years.clear();
            return;
        }
        self.collapsed_years = SavingsService::new().default_collapsed_years(window, current_year);
        // A selection made before the reset still needs its year visible.
        if let Some(selected) = self.selected_month.as_deref() {
            self.collapsed_years.remove(year_of(selected));
        }
    }

    pub fn group_by_year(&self) -> bool {
        self.group_by_year
    }

    pub fn is_collapsed(&self, year: &str) -> bool {
        self.group_by_year && self.collapsed_years.contains(year)
    }

    pub fn collapsed_years(&self) -> &BTreeSet<String> {
        &self.collapsed_years
    }

    /// Header click: collapse an expanded year or expand a collapsed one.
    pub fn toggle_year(&mut self, year: &str) {
        if !self.collapsed_years.remove(year) {
            self.collapsed_years.insert(year.to_string());
        }
    }

    // ── Comments drawer ─────────────────────────────────────────────

    pub fn drawer_month(&self) -> Option<&str> {
        self.drawer_month.as_deref()
    }

    /// Comments of the month shown in the drawer; empty when closed.
    pub fn drawer_comments<'a>(&self, window: &'a [MonthlySavingsPoint]) -> &'a [MonthComment] {
        self.drawer_month
            .as_deref()
            .and_then(|month| window.iter().find(|m| m.month == month))
            .map(|m| m.comments.as_slice())
            .unwrap_or(&[])
    }

    pub fn close_drawer(&mut self) {
        self.drawer_month = None;
    }
}
