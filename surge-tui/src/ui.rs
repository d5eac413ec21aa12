//! Render pass: status strip, scanner table, detail panels, key help.

use crate::app::{App, Mode};
use crate::format;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Sparkline, Table, TableState},
    Frame,
};
use surge_core::{Row, WatchlistStore};

pub fn render(f: &mut Frame, app: &App) {
    let detail_open = app
        .selected_symbol()
        .map(|s| app.state.is_expanded(s))
        .unwrap_or(false);

    let constraints = if detail_open {
        vec![
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(12),
            Constraint::Length(1),
        ]
    } else {
        vec![
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    render_status(f, app, chunks[0]);
    render_table(f, app, chunks[1]);
    if detail_open {
        if let Some(row) = app.state.filtered.get(app.selected) {
            render_detail(f, app, chunks[2], row);
        }
        render_footer(f, app, chunks[3]);
    } else {
        render_footer(f, app, chunks[2]);
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let status = app.state.status();
    let windows = app.state.windows;

    let mut top = vec![Span::styled(
        format!(
            "{} of {} shown • {} {} • maxHist={} • ivHist={} syms • As of {}",
            status.shown,
            status.total,
            status.interval,
            status.period,
            status.max_hist,
            status.iv_symbols,
            if status.as_of.is_empty() {
                format::UNAVAILABLE
            } else {
                status.as_of.as_str()
            },
        ),
        Style::default().fg(Color::Gray),
    )];
    if let Some(notice) = &app.notice {
        top.push(Span::raw("  "));
        top.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let query_style = if app.mode == Mode::Query {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let bottom = vec![
        Span::styled(
            format!(
                "sort: {} {} • sector: {} • alert: {} • watch-only: {}",
                app.state.sort_key.label(),
                app.state.sort_dir.label(),
                app.state.filters.sector.as_deref().unwrap_or("all"),
                app.state.filters.alert_code.as_deref().unwrap_or("all"),
                if app.state.filters.watchlist_only { "on" } else { "off" },
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "RSI({}) Sharpe({}) IV({})",
                windows.rsi, windows.sharpe, windows.iv
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(format!("/{}", app.state.filters.query), query_style),
    ];

    let paragraph = Paragraph::new(vec![Line::from(top), Line::from(bottom)]);
    f.render_widget(paragraph, area);
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let header_cells = [
        "", "★", "Symbol", "Name", "Sector", "Price", "1D%", "5D%", "RSI", "Sharpe", "VolZ",
        "IVR", "IV%", "Surge", "Alerts",
    ]
    .iter()
    .map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = TableRow::new(header_cells).height(1);

    let rows = app.state.filtered.iter().map(|row| {
        let chevron = if app.state.is_expanded(&row.symbol) {
            "▾"
        } else {
            "▸"
        };
        let starred = if app.watchlist.contains(&row.symbol) {
            "★"
        } else {
            " "
        };

        let cells = vec![
            Cell::from(chevron),
            Cell::from(starred).style(Style::default().fg(Color::Yellow)),
            Cell::from(row.symbol.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(row.name.clone()),
            Cell::from(row.sector.clone()).style(Style::default().fg(Color::Gray)),
            Cell::from(format::num(row.price, 2)),
            ret_cell(row.ret1d),
            ret_cell(row.ret5d),
            rsi_cell(row.rsi_ui),
            Cell::from(format::num(row.sharpe_ui, 3)),
            Cell::from(format::num(row.vol_z, 2)),
            Cell::from(format::num(row.iv_rank_ui, 2)),
            Cell::from(format::num(row.iv_pct_ui, 2)),
            Cell::from(format!("{:.2}", row.surge)),
            alert_cell(row),
        ];
        TableRow::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL).title(" SURGE SCANNER "));

    let mut table_state = TableState::default();
    if !app.state.filtered.is_empty() {
        table_state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn ret_cell(value: Option<f64>) -> Cell<'static> {
    let color = match value {
        Some(v) if v > 0.0 => Color::Green,
        Some(v) if v < 0.0 => Color::Red,
        _ => Color::Gray,
    };
    Cell::from(format::pct(value)).style(Style::default().fg(color))
}

fn rsi_cell(value: Option<f64>) -> Cell<'static> {
    let color = match value {
        Some(v) if v >= 70.0 => Color::Red,
        Some(v) if v <= 30.0 => Color::Green,
        Some(_) => Color::Gray,
        None => Color::DarkGray,
    };
    Cell::from(format::num(value, 1)).style(Style::default().fg(color))
}

fn alert_cell(row: &Row) -> Cell<'static> {
    if row.alert_count == 0 {
        Cell::from("0").style(Style::default().fg(Color::DarkGray))
    } else {
        Cell::from(row.alert_count.to_string()).style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    }
}

fn render_detail(f: &mut Frame, app: &App, area: Rect, row: &Row) {
    let windows = app.state.windows;
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let kv = |k: &str, v: String| {
        Line::from(vec![
            Span::styled(format!("{:<14}", k), Style::default().fg(Color::Gray)),
            Span::raw(v),
        ])
    };
    // Dividend yield arrives as a whole-number percent.
    let div_pct = row.div_yield.map(|d| d / 100.0);

    let lines = vec![
        kv("Symbol", format!("{} ({})", row.symbol, row.name)),
        kv("Sector", row.sector.clone()),
        kv("Price", format::num(row.price, 2)),
        kv(
            "1D / 5D",
            format!("{} / {}", format::pct(row.ret1d), format::pct(row.ret5d)),
        ),
        kv(
            &format!("RSI ({})", windows.rsi),
            format::num(row.rsi_ui, 1),
        ),
        kv(
            &format!("Sharpe ({})", windows.sharpe),
            format::num(row.sharpe_ui, 3),
        ),
        kv("Vol Z", format::num(row.vol_z, 2)),
        kv("IV30", format::pct(row.iv30)),
        kv(
            &format!("IV Rank ({})", windows.iv),
            format::num(row.iv_rank_ui, 2),
        ),
        kv(
            &format!("IV %ile ({})", windows.iv),
            format::num(row.iv_pct_ui, 2),
        ),
    ];
    let left = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", row.symbol)),
    );
    f.render_widget(left, halves[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(halves[1]);

    // spark30 is normalized to [0, 1]; scale up for the integer widget.
    // Fewer than 2 points draw nothing meaningful, so show the block empty.
    let spark_data: Vec<u64> = if row.spark30.len() >= 2 {
        row.spark30.iter().map(|v| (v * 100.0) as u64).collect()
    } else {
        Vec::new()
    };
    let spark = Sparkline::default()
        .data(&spark_data)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" 30d "));
    f.render_widget(spark, right[0]);

    let fundamentals = vec![
        kv("P/E", format::num(row.pe_ttm, 2)),
        kv("P/B", format::num(row.pb, 2)),
        kv("Div%", format::pct(div_pct)),
        kv("MktCap", format::mcap(row.mcap)),
        kv("Beta", format::num(row.beta, 2)),
        kv("News (24h)", format::count(row.news_24h)),
    ];
    let right_panel = Paragraph::new(fundamentals)
        .block(Block::default().borders(Borders::ALL).title(" Fundamentals "));
    f.render_widget(right_panel, right[1]);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        Mode::Query => "typing filters by symbol/name • Enter/Esc done",
        Mode::Normal => {
            "q quit • / search • s/S sort • d dir • c sector • a alert • w watch-only • \
             m mark • Enter expand • r reload • [ ] RSI • { } Sharpe • - = IV"
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(footer, area);
}
