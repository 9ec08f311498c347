// ═══════════════════════════════════════════════════════════════════
// View Tests — SelectionCoordinator, SavingsPage, EvolutionView
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use fintrack_core::models::dashboard::PatrimonioPoint;
use fintrack_core::models::range::{MonthRange, SeriesRange};
use fintrack_core::models::savings::{MonthComment, MonthlySavingsPoint};
use fintrack_core::models::series::RvPoint;
use fintrack_core::services::chart_service::BAR_OPACITY_DIMMED;
use fintrack_core::views::dashboard::DashboardView;
use fintrack_core::views::evolution::{AssetOverview, EvolutionView, RvOverview};
use fintrack_core::views::savings::SavingsPage;
use fintrack_core::views::selection::{SelectionCoordinator, SelectionOrigin};

// ═══════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════

fn month(key: &str, real_savings: Option<&str>) -> MonthlySavingsPoint {
    MonthlySavingsPoint {
        month: key.to_string(),
        cash_end: "1000.00".to_string(),
        cash_delta: real_savings.map(str::to_string),
        investment_cost_delta: real_savings.map(|_| "0.00".to_string()),
        real_savings: real_savings.map(str::to_string),
        comments: Vec::new(),
    }
}

fn commented(key: &str, note: &str) -> MonthlySavingsPoint {
    let mut m = month(key, Some("10.00"));
    m.comments.push(MonthComment {
        account_name: "Cuenta corriente".into(),
        date: format!("{key}-15"),
        note: note.into(),
    });
    m
}

/// 2022-06 .. 2025-05, one month each, delta = 10 except where overridden.
fn history() -> Vec<MonthlySavingsPoint> {
    let mut out = Vec::new();
    let (mut y, mut m) = (2022, 6);
    for _ in 0..36 {
        out.push(month(&format!("{y:04}-{m:02}"), Some("10")));
        m += 1;
        if m > 12 {
            m = 1;
            y += 1;
        }
    }
    out
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// SelectionCoordinator
// ═══════════════════════════════════════════════════════════════════

mod selection {
    use super::*;

    #[test]
    fn chart_click_twice_clears_selection() {
        let mut sel = SelectionCoordinator::new();
        sel.select_from_chart("2024-03");
        assert_eq!(sel.selected_month(), Some("2024-03"));
        sel.select_from_chart("2024-03");
        assert_eq!(sel.selected_month(), None);
    }

    #[test]
    fn chart_click_on_another_month_moves_selection() {
        let mut sel = SelectionCoordinator::new();
        sel.select_from_chart("2024-03");
        sel.select_from_chart("2024-07");
        assert_eq!(sel.selected_month(), Some("2024-07"));
        assert!(sel.is_selected("2024-07"));
        assert!(!sel.is_selected("2024-03"));
    }

    #[test]
    fn chart_selection_queues_exactly_one_scroll() {
        let mut sel = SelectionCoordinator::new();
        let effects = sel.select_from_chart("2024-03");
        assert!(effects.scroll_requested);
        assert!(sel.take_scroll_request());
        assert!(!sel.take_scroll_request());
    }

    #[test]
    fn clearing_from_chart_does_not_scroll() {
        let mut sel = SelectionCoordinator::new();
        sel.select_from_chart("2024-03");
        sel.take_scroll_request();
        let effects = sel.select_from_chart("2024-03");
        assert!(!effects.scroll_requested);
        assert!(!sel.take_scroll_request());
    }

    #[test]
    fn table_selection_does_not_scroll() {
        let mut sel = SelectionCoordinator::new();
        let effects = sel.set_selection(Some("2024-03".into()), SelectionOrigin::Table);
        assert!(!effects.scroll_requested);
        assert!(!sel.take_scroll_request());
    }

    #[test]
    fn selection_expands_its_collapsed_year() {
        let window = history();
        let mut sel = SelectionCoordinator::new();
        sel.reset_window(&window, true, 2025);
        assert!(sel.is_collapsed("2023"));
        assert!(!sel.is_collapsed("2025"));

        let effects = sel.select_from_chart("2023-04");
        assert_eq!(effects.expanded_year.as_deref(), Some("2023"));
        assert!(!sel.is_collapsed("2023"));
        assert!(sel.is_collapsed("2022"));
    }

    #[test]
    fn no_expansion_without_grouping() {
        let window = history();
        let mut sel = SelectionCoordinator::new();
        sel.reset_window(&window, false, 2025);
        assert!(sel.collapsed_years().is_empty());
        let effects = sel.select_from_chart("2023-04");
        assert_eq!(effects.expanded_year, None);
    }

    #[test]
    fn toggle_year_collapses_and_expands() {
        let mut sel = SelectionCoordinator::new();
        sel.reset_window(&history(), true, 2025);
        sel.toggle_year("2025");
        assert!(sel.is_collapsed("2025"));
        sel.toggle_year("2025");
        assert!(!sel.is_collapsed("2025"));
    }

    #[test]
    fn reset_keeps_the_selected_year_open() {
        let mut sel = SelectionCoordinator::new();
        sel.select_from_chart("2023-04");
        sel.reset_window(&history(), true, 2025);
        assert!(!sel.is_collapsed("2023"));
        assert!(sel.is_collapsed("2024"));
    }

    #[test]
    fn row_click_sets_and_opens_drawer_only_with_comments() {
        let window = vec![month("2024-01", Some("5")), commented("2024-02", "Bonus")];
        let mut sel = SelectionCoordinator::new();

        let effects = sel.click_row("2024-01", &window);
        assert_eq!(sel.selected_month(), Some("2024-01"));
        assert_eq!(effects.drawer_opened, None);
        assert_eq!(sel.drawer_month(), None);

        // Same row again: still selected (set, not toggle).
        sel.click_row("2024-01", &window);
        assert_eq!(sel.selected_month(), Some("2024-01"));

        let effects = sel.click_row("2024-02", &window);
        assert_eq!(effects.drawer_opened.as_deref(), Some("2024-02"));
        assert_eq!(sel.drawer_comments(&window)[0].note, "Bonus");

        sel.close_drawer();
        assert!(sel.drawer_comments(&window).is_empty());
        assert_eq!(sel.selected_month(), Some("2024-02"));
    }

    #[test]
    fn selection_outside_window_is_not_highlighted() {
        let window = vec![month("2025-01", Some("5"))];
        let mut sel = SelectionCoordinator::new();
        sel.select_from_chart("2023-04");
        assert!(!sel.has_selection(&window));
        sel.select_from_chart("2025-01");
        assert!(sel.has_selection(&window));
    }
}

// ═══════════════════════════════════════════════════════════════════
// SavingsPage
// ═══════════════════════════════════════════════════════════════════

mod savings_page {
    use super::*;

    #[test]
    fn defaults_to_one_year_without_normalize() {
        let page = SavingsPage::new(history(), today());
        assert_eq!(page.range(), MonthRange::OneYear);
        assert!(!page.normalize());
        // 1A on 2025-05-20: cutoff 2024-05 → 2024-05 .. 2025-05
        assert_eq!(page.window().len(), 13);
        assert_eq!(page.window()[0].month, "2024-05");
        assert!(!page.groups_by_year());
    }

    #[test]
    fn input_is_sorted_and_deduplicated() {
        let mut months = history();
        months.reverse();
        months.push(month("2025-05", Some("10")));
        let page = SavingsPage::new(months, today());
        assert_eq!(page.months().len(), 36);
        assert_eq!(page.months()[0].month, "2022-06");
        assert_eq!(page.months()[35].month, "2025-05");
    }

    #[test]
    fn stats_follow_range_and_normalize() {
        let mut months = history();
        months[35].real_savings = Some("1000".into());
        let mut page = SavingsPage::new(months, today());
        page.set_range(MonthRange::ThreeMonths);
        // 3M on 2025-05-20: 2025-02 .. 2025-05, (10 + 10 + 10 + 1000) / 4
        assert_eq!(page.stats().unwrap().avg_monthly_delta.as_deref(), Some("257.50"));
        assert!(!page.can_normalize());

        page.set_range(MonthRange::OneYear);
        page.set_normalize(true);
        assert!(page.can_normalize());
        let stats = page.stats().unwrap();
        assert!(stats.is_normalized);
        assert_eq!(stats.avg_monthly_delta.as_deref(), Some("10.00"));
        assert_eq!(page.average_subtitle().as_deref(), Some("último año · sin outliers"));
    }

    #[test]
    fn titles_per_range() {
        let mut page = SavingsPage::new(history(), today());
        assert_eq!(page.table_title(), "último año");
        assert_eq!(page.average_subtitle().as_deref(), Some("último año"));
        page.set_range(MonthRange::Max);
        assert_eq!(page.table_title(), "Histórico completo");
        assert_eq!(page.average_subtitle().as_deref(), Some("historial completo"));
    }

    #[test]
    fn window_caption() {
        let mut page = SavingsPage::new(history(), today());
        page.set_range(MonthRange::ThreeMonths);
        assert_eq!(
            page.window_caption().as_deref(),
            Some("Mostrando 4 meses · Feb 2025 – May 2025")
        );
        let single = SavingsPage::new(vec![month("2025-05", Some("1"))], today());
        assert_eq!(
            single.window_caption().as_deref(),
            Some("Mostrando 1 mes · May 2025 – May 2025")
        );
    }

    #[test]
    fn max_range_groups_and_collapses_past_years() {
        let mut page = SavingsPage::new(history(), today());
        page.set_range(MonthRange::Max);
        assert!(page.groups_by_year());

        let groups = page.year_groups();
        let years: Vec<&str> = groups.iter().map(|g| g.year.as_str()).collect();
        assert_eq!(years, vec!["2025", "2024", "2023", "2022"]);
        assert_eq!(groups[0].month_count(), 5);
        assert_eq!(groups[0].year_delta, 50.0);

        assert!(!page.is_collapsed("2025"));
        assert!(page.is_collapsed("2024"));
        assert!(page.is_collapsed("2022"));
    }

    #[test]
    fn leaving_max_stops_grouping() {
        let mut page = SavingsPage::new(history(), today());
        page.set_range(MonthRange::Max);
        page.set_range(MonthRange::SixMonths);
        assert!(!page.is_collapsed("2024"));
        assert!(!page.selection().group_by_year());
    }

    #[test]
    fn chart_and_table_share_one_selection() {
        let mut months = history();
        months[30] = commented("2024-12", "Regalos");
        let mut page = SavingsPage::new(months, today());
        page.set_range(MonthRange::Max);

        let effects = page.select_from_chart("2024-12");
        assert!(effects.scroll_requested);
        assert_eq!(effects.expanded_year.as_deref(), Some("2024"));
        assert!(page.take_scroll_request());
        assert!(page.has_selection());

        let bars = page.bars();
        assert!(bars.iter().any(|b| b.is_selected && b.month == "2024-12"));
        assert_eq!(page.rows()[5].month, "2024-12");

        let effects = page.click_row("2024-12");
        assert_eq!(effects.drawer_opened.as_deref(), Some("2024-12"));
        assert_eq!(page.drawer_comments()[0].note, "Regalos");
        assert_eq!(page.selected_month(), Some("2024-12"));

        page.close_drawer();
        page.select_from_chart("2024-12");
        assert_eq!(page.selected_month(), None);
        assert!(page.bars().iter().all(|b| !b.is_selected));
    }

    #[test]
    fn selected_month_without_savings_agrees_with_bar_dimming() {
        let mut months = history();
        months[35] = month("2025-05", None);
        let mut page = SavingsPage::new(months, today());

        page.select_from_chart("2025-05");
        assert!(page.has_selection());
        let bars = page.bars();
        assert!(bars.iter().all(|b| !b.is_selected));
        assert!(bars.iter().all(|b| b.opacity == BAR_OPACITY_DIMMED));
    }

    #[test]
    fn cash_return_follows_the_window() {
        let mut months = history();
        months[35].cash_end = "1500.00".to_string();
        let mut page = SavingsPage::new(months, today());

        let period = *page.cash_return().period().unwrap();
        assert_eq!(period.first, 1000.0);
        assert_eq!(period.last, 1500.0);
        assert!((period.percent_delta - 50.0).abs() < 1e-9);

        page.set_range(MonthRange::Max);
        assert_eq!(page.cash_return().period().unwrap().absolute_delta, 500.0);
    }

    #[test]
    fn toggle_year_through_page() {
        let mut page = SavingsPage::new(history(), today());
        page.set_range(MonthRange::Max);
        page.toggle_year("2023");
        assert!(!page.is_collapsed("2023"));
    }

    #[test]
    fn bar_width_grows_with_window() {
        let mut page = SavingsPage::new(history(), today());
        page.set_range(MonthRange::ThreeMonths);
        assert_eq!(page.bar_min_width(), 260);
        assert_eq!(page.month_label_interval(), None);
        page.set_range(MonthRange::Max);
        assert_eq!(page.bar_min_width(), 36 * 30);
        assert_eq!(page.month_label_interval(), Some(3));
    }

    #[test]
    fn empty_page() {
        let page = SavingsPage::new(Vec::new(), today());
        assert!(page.is_empty());
        assert!(page.stats().is_none());
        assert!(page.window_caption().is_none());
        assert!(page.average_subtitle().is_none());
        assert!(page.bars().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// EvolutionView
// ═══════════════════════════════════════════════════════════════════

mod evolution {
    use super::*;
    use fintrack_core::models::series::AssetPositionPoint;

    fn rv_series() -> Vec<RvPoint> {
        vec![
            RvPoint {
                captured_at: at(2023, 1, 10),
                value: "800".into(),
            },
            RvPoint {
                captured_at: at(2024, 1, 1),
                value: "1000".into(),
            },
            RvPoint {
                captured_at: at(2024, 6, 1),
                value: "1100".into(),
            },
        ]
    }

    #[test]
    fn window_and_return_follow_range() {
        let now = at(2024, 6, 2);
        let mut view = EvolutionView::new(rv_series(), now);
        assert_eq!(view.range(), SeriesRange::OneYear);
        assert_eq!(view.window().len(), 2);
        assert_eq!(view.range_return().period().unwrap().absolute_delta, 100.0);

        view.set_range(SeriesRange::Max);
        assert_eq!(view.window().len(), 3);
        assert_eq!(view.range_return().period().unwrap().absolute_delta, 300.0);

        view.set_range(SeriesRange::OneWeek);
        assert!(!view.range_return().is_sufficient());
    }

    #[test]
    fn unsorted_points_are_ordered() {
        let mut points = rv_series();
        points.reverse();
        let view = EvolutionView::new(points, at(2024, 6, 2)).with_range(SeriesRange::Max);
        assert_eq!(view.points()[0].value, "800");
    }

    #[test]
    fn rv_overview_uses_live_portfolio_value() {
        let now = at(2024, 6, 2);
        let view = RvOverview::new(rv_series(), now).with_live(Some(1180.0), None);
        let headline = view.headline();
        assert_eq!(headline.display_value, 1180.0);
        assert!(headline.is_live_updated);

        let stale = RvOverview::from_portfolio(rv_series(), None, now);
        let headline = stale.headline();
        assert_eq!(headline.display_value, 1100.0);
        assert!(!headline.is_live_updated);
    }

    #[test]
    fn hover_and_range_change() {
        let now = at(2024, 6, 2);
        let points = vec![
            AssetPositionPoint {
                captured_at: at(2024, 3, 1),
                market_value: "500".into(),
                cost_basis: "450".into(),
            },
            AssetPositionPoint {
                captured_at: at(2024, 5, 1),
                market_value: "650".into(),
                cost_basis: "460".into(),
            },
        ];
        let mut view = AssetOverview::new(points, now).with_live(Some(700.0), Some(470.0));
        assert_eq!(view.headline().display_cost_basis, Some(470.0));

        let hovered = view.hover_at(1).cloned().unwrap();
        assert_eq!(hovered.value, 650.0);
        let headline = view.headline();
        assert_eq!(headline.display_value, 650.0);
        assert_eq!(headline.display_cost_basis, Some(460.0));
        assert!(!headline.is_live_updated);

        assert!(view.hover_at(5).is_none());
        assert!(view.hovered().is_none());

        view.hover_at(0);
        view.set_range(SeriesRange::ThreeMonths);
        assert!(view.hovered().is_none());
        assert_eq!(view.axis_ticks(), vec![at(2024, 5, 1)]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// DashboardView
// ═══════════════════════════════════════════════════════════════════

mod dashboard {
    use super::*;

    fn point(month: &str, cash: &str) -> PatrimonioPoint {
        PatrimonioPoint {
            month: month.into(),
            cash: cash.into(),
            investments: "100.00".into(),
            renta_variable: None,
            renta_fija: None,
        }
    }

    #[test]
    fn points_are_sorted_and_deduplicated() {
        let view = DashboardView::new(
            vec![point("2024-03", "30"), point("2024-01", "10"), point("2024-03", "99")],
            None,
        );
        let months: Vec<&str> = view.patrimonio().iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-03"]);
        assert_eq!(view.patrimonio_summary().total, 130.0);
    }

    #[test]
    fn without_valuation_figures_are_neutral() {
        let view = DashboardView::new(Vec::new(), None);
        assert!(!view.has_evolution());
        assert!(view.allocation().is_empty());
        assert_eq!(view.unrealized_pnl_pct(), 0.0);
        assert!(!view.shows_cash_breakdown());
        assert_eq!(view.patrimonio_rows().len(), 0);
    }
}
