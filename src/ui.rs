use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use secondary_market::{
    analyze_form, write_memo, AnalysisResult, BuyerType, ContingentEvent, DecisionPoint,
    EconomicInterest, EntityInvolvement, EntrySide, FormValue, MemoFormatter, ParseMode,
    RawTransactionInput, SellerType, ShareStatus, TransactionInput, YesNo,
};
use secondary_market::money::format_currency;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Input,
    Flowchart,
    Results,
    Memo,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Input => Page::Flowchart,
            Page::Flowchart => Page::Results,
            Page::Results => Page::Memo,
            Page::Memo => Page::Input,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Input => Page::Memo,
            Page::Flowchart => Page::Input,
            Page::Results => Page::Flowchart,
            Page::Memo => Page::Results,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Input => "Input",
            Page::Flowchart => "Flowchart",
            Page::Results => "Results",
            Page::Memo => "Memo",
        }
    }
}

// ============================================================================
// FORM FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CompanyName,
    TransactionDate,
    TransactionPrice,
    FairValue,
    NumberOfShares,
    SellerType,
    BuyerType,
    EconomicInterest,
    EntityInvolvement,
    ShareStatus,
    MonthsHeld,
    PreviouslyCost,
    ShortTermInducement,
    HasPattern,
    ContingentEvent,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::CompanyName,
        Field::TransactionDate,
        Field::TransactionPrice,
        Field::FairValue,
        Field::NumberOfShares,
        Field::SellerType,
        Field::BuyerType,
        Field::EconomicInterest,
        Field::EntityInvolvement,
        Field::ShareStatus,
        Field::MonthsHeld,
        Field::PreviouslyCost,
        Field::ShortTermInducement,
        Field::HasPattern,
        Field::ContingentEvent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::CompanyName => "Company Name",
            Field::TransactionDate => "Transaction Date",
            Field::TransactionPrice => "Transaction Price / Share",
            Field::FairValue => "Fair Value / Share",
            Field::NumberOfShares => "Number of Shares",
            Field::SellerType => "Seller Type",
            Field::BuyerType => "Buyer Type",
            Field::EconomicInterest => "Buyer's Economic Interest",
            Field::EntityInvolvement => "Entity Involvement",
            Field::ShareStatus => "Share Status",
            Field::MonthsHeld => "Months Held",
            Field::PreviouslyCost => "Previously Recognized Cost / Share",
            Field::ShortTermInducement => "Short-Term Inducement?",
            Field::HasPattern => "Pattern of Repurchases?",
            Field::ContingentEvent => "Contingent Repurchase Event",
        }
    }

    /// (wire value, label) pairs for choice fields; the first entry is "unset"
    pub fn choices(&self) -> Option<Vec<(&'static str, &'static str)>> {
        fn options<T: FormValue>() -> Vec<(&'static str, &'static str)> {
            let mut all = vec![("", "-")];
            all.extend(T::ALL.iter().map(|v| (v.as_str(), v.label())));
            all
        }

        match self {
            Field::SellerType => Some(options::<SellerType>()),
            Field::BuyerType => Some(options::<BuyerType>()),
            Field::EconomicInterest => Some(options::<EconomicInterest>()),
            Field::EntityInvolvement => Some(options::<EntityInvolvement>()),
            Field::ShareStatus => Some(options::<ShareStatus>()),
            Field::ShortTermInducement | Field::HasPattern => Some(options::<YesNo>()),
            Field::ContingentEvent => Some(options::<ContingentEvent>()),
            _ => None,
        }
    }

    /// Whether the answer can affect the outcome given the rest of the form
    pub fn is_relevant(&self, form: &RawTransactionInput) -> bool {
        let seller = SellerType::from_form(&form.seller_type);
        let buyer = BuyerType::from_form(&form.buyer_type);
        let service_provider = seller.map(|s| !s.is_investor()).unwrap_or(true);
        let immature = ShareStatus::from_form(&form.share_status) == Some(ShareStatus::Immature);

        match self {
            Field::EconomicInterest => service_provider && buyer.map(|b| b.is_related()).unwrap_or(false),
            Field::EntityInvolvement => {
                service_provider && matches!(buyer, Some(b) if b != BuyerType::Entity)
            }
            Field::ShareStatus => service_provider,
            Field::MonthsHeld
            | Field::PreviouslyCost
            | Field::ShortTermInducement
            | Field::HasPattern
            | Field::ContingentEvent => service_provider && immature,
            _ => true,
        }
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub form: RawTransactionInput,
    pub current_page: Page,
    pub selected_field: usize,
    pub analysis: Option<(TransactionInput, AnalysisResult)>,
    pub formatter: MemoFormatter,
    pub memo_dir: PathBuf,
    pub memo_scroll: u16,
    pub status: String,
}

impl App {
    pub fn new(formatter: MemoFormatter, memo_dir: PathBuf) -> Self {
        Self {
            form: RawTransactionInput::default(),
            current_page: Page::Input,
            selected_field: 0,
            analysis: None,
            formatter,
            memo_dir,
            memo_scroll: 0,
            status: "Fill in the transaction and press F5 to analyze".to_string(),
        }
    }

    pub fn selected(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % Field::ALL.len();
    }

    pub fn previous_field(&mut self) {
        self.selected_field = if self.selected_field == 0 {
            Field::ALL.len() - 1
        } else {
            self.selected_field - 1
        };
    }

    pub fn value(&self, field: Field) -> &str {
        let form = &self.form;
        match field {
            Field::CompanyName => &form.company_name,
            Field::TransactionDate => &form.transaction_date,
            Field::TransactionPrice => &form.transaction_price,
            Field::FairValue => &form.fair_value,
            Field::NumberOfShares => &form.number_of_shares,
            Field::SellerType => &form.seller_type,
            Field::BuyerType => &form.buyer_type,
            Field::EconomicInterest => &form.economic_interest,
            Field::EntityInvolvement => &form.entity_involvement,
            Field::ShareStatus => &form.share_status,
            Field::MonthsHeld => &form.months_held,
            Field::PreviouslyCost => &form.previously_cost,
            Field::ShortTermInducement => &form.is_short_term_inducement,
            Field::HasPattern => &form.has_pattern,
            Field::ContingentEvent => &form.contingent_event,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        let form = &mut self.form;
        match field {
            Field::CompanyName => &mut form.company_name,
            Field::TransactionDate => &mut form.transaction_date,
            Field::TransactionPrice => &mut form.transaction_price,
            Field::FairValue => &mut form.fair_value,
            Field::NumberOfShares => &mut form.number_of_shares,
            Field::SellerType => &mut form.seller_type,
            Field::BuyerType => &mut form.buyer_type,
            Field::EconomicInterest => &mut form.economic_interest,
            Field::EntityInvolvement => &mut form.entity_involvement,
            Field::ShareStatus => &mut form.share_status,
            Field::MonthsHeld => &mut form.months_held,
            Field::PreviouslyCost => &mut form.previously_cost,
            Field::ShortTermInducement => &mut form.is_short_term_inducement,
            Field::HasPattern => &mut form.has_pattern,
            Field::ContingentEvent => &mut form.contingent_event,
        }
    }

    /// Typing only edits free-text fields
    pub fn type_char(&mut self, c: char) {
        let field = self.selected();
        if field.choices().is_none() {
            self.value_mut(field).push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.selected();
        if field.choices().is_none() {
            self.value_mut(field).pop();
        }
    }

    /// Step through the options of a choice field
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = self.selected();
        let Some(choices) = field.choices() else {
            return;
        };

        let current = choices
            .iter()
            .position(|(value, _)| *value == self.value(field))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else if current == 0 {
            choices.len() - 1
        } else {
            current - 1
        };

        *self.value_mut(field) = choices[next].0.to_string();
    }

    pub fn run_analysis(&mut self) {
        match analyze_form(&self.form, ParseMode::Lenient) {
            Ok((input, result)) => {
                self.status = format!("Analysis complete: {}", result.treatment_label);
                self.analysis = Some((input, result));
                self.memo_scroll = 0;
                self.current_page = Page::Results;
            }
            Err(e) => {
                self.status = format!("Cannot analyze: {}", e);
            }
        }
    }

    pub fn memo_text(&self) -> Option<String> {
        let (input, result) = self.analysis.as_ref()?;
        Some(self.formatter.format(input, result))
    }

    pub fn save_memo(&mut self) {
        let Some((input, result)) = self.analysis.as_ref() else {
            self.status = "Run the analysis before saving a memo".to_string();
            return;
        };

        let memo = self.formatter.format(input, result);
        self.status = match write_memo(&self.memo_dir, input, &memo) {
            Ok(path) => format!("Memo saved to {}", path.display()),
            Err(e) => format!("Failed to save memo: {:#}", e),
        };
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    fn visited(&self, point: DecisionPoint) -> bool {
        self.analysis
            .as_ref()
            .map(|(_, result)| result.visited().contains(&point))
            .unwrap_or(false)
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => app.run_analysis(),
            KeyCode::F(5) => app.run_analysis(),
            KeyCode::Tab => app.next_page(),
            KeyCode::BackTab => app.previous_page(),
            _ if app.current_page == Page::Input => match key.code {
                KeyCode::Down | KeyCode::Enter => app.next_field(),
                KeyCode::Up => app.previous_field(),
                KeyCode::Right => app.cycle_choice(true),
                KeyCode::Left => app.cycle_choice(false),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) => app.type_char(c),
                _ => {}
            },
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Char('s') if app.current_page == Page::Memo => app.save_memo(),
            KeyCode::Down | KeyCode::Char('j') if app.current_page == Page::Memo => {
                app.memo_scroll = app.memo_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') if app.current_page == Page::Memo => {
                app.memo_scroll = app.memo_scroll.saturating_sub(1);
            }
            KeyCode::PageDown if app.current_page == Page::Memo => {
                app.memo_scroll = app.memo_scroll.saturating_add(20);
            }
            KeyCode::PageUp if app.current_page == Page::Memo => {
                app.memo_scroll = app.memo_scroll.saturating_sub(20);
            }
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Input => render_input(f, chunks[1], app),
        Page::Flowchart => render_flowchart(f, chunks[1], app),
        Page::Results => render_results(f, chunks[1], app),
        Page::Memo => render_memo(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Input, Page::Flowchart, Page::Results, Page::Memo];

    let mut tab_spans = vec![Span::styled(
        "ASC 718 Secondary Market Analysis  ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    if let Some((_, result)) = &app.analysis {
        let color = if result.is_compensatory { Color::Red } else { Color::Green };
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(result.treatment_label.clone(), Style::default().fg(color)));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let rows = Field::ALL.iter().enumerate().map(|(i, field)| {
        let raw = app.value(*field);
        let shown = match field.choices() {
            Some(choices) => {
                let label = choices
                    .iter()
                    .find(|(value, _)| *value == raw)
                    .map(|(_, label)| *label)
                    .unwrap_or("-");
                format!("◀ {} ▶", label)
            }
            None if i == app.selected_field => format!("{}▏", raw),
            None => raw.to_string(),
        };

        let mut style = if field.is_relevant(&app.form) {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if i == app.selected_field {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }

        Row::new(vec![Cell::from(field.label()), Cell::from(shown)]).style(style)
    });

    let table = Table::new(rows, [Constraint::Length(36), Constraint::Min(20)])
        .header(
            Row::new(vec!["Field", "Value"])
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Transaction "),
        );

    f.render_widget(table, area);
}

fn render_flowchart(f: &mut Frame, area: Rect, app: &App) {
    let nodes: [(u16, &str, Option<DecisionPoint>); 12] = [
        (0, "Is the seller an employee or other service provider?", Some(DecisionPoint::SellerType)),
        (1, "No (investor) → distribution / capital transaction / no impact", None),
        (0, "Does the transaction price exceed fair value?", Some(DecisionPoint::PriceVsFairValue)),
        (1, "No → no excess consideration, no compensation", None),
        (0, "Who bought the shares?", Some(DecisionPoint::BuyerType)),
        (1, "Entity → compensation cost (ASC 718-20-35-7)", None),
        (1, "Related party / economic holder → presumed on entity's behalf", None),
        (2, "Is the holder's economic interest de minimis?", Some(DecisionPoint::EconomicInterest)),
        (1, "New investor / de minimis holder →", None),
        (2, "Did the entity facilitate the transaction?", Some(DecisionPoint::EntityInvolvement)),
        (0, "Were the shares held less than 6 months?", Some(DecisionPoint::ShareMaturity)),
        (1, "Inducement exception / repurchase pattern / contingent event", Some(DecisionPoint::RepurchaseFeature)),
    ];

    let lines: Vec<Line> = nodes
        .iter()
        .map(|(depth, text, point)| {
            let visited = point.map(|p| app.visited(p)).unwrap_or(false);
            let style = if visited {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if point.is_some() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let marker = if visited { "● " } else { "○ " };
            Line::from(vec![
                Span::raw("  ".repeat(*depth as usize + 1)),
                Span::styled(format!("{}{}", marker, text), style),
            ])
        })
        .collect();

    let chart = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" ASC 718 Decision Framework "),
    );
    f.render_widget(chart, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let Some((_, result)) = &app.analysis else {
        let empty = Paragraph::new("No analysis yet. Complete the Input page and press F5.")
            .block(Block::default().borders(Borders::ALL).title(" Results "));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let verdict_color = if result.is_compensatory { Color::Red } else { Color::Green };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Treatment:        ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                result.treatment_label.clone(),
                Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        detail_line("Compensatory:", if result.is_compensatory { "Yes" } else { "No" }.to_string()),
        detail_line("Compensation:", format_currency(result.compensation_amount)),
        detail_line("Excess / Share:", format_currency(result.excess_per_share)),
        detail_line("Total Excess:", format_currency(result.total_excess)),
        detail_line("Total Value:", format_currency(result.total_transaction_value)),
    ];
    if result.requires_reclassification {
        lines.push(Line::from(Span::styled(
            format!("⚠ Reclassify as liability: {}", result.reclassification_reason),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Reasoning",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    for (i, step) in result.reasoning.iter().enumerate() {
        let color = if step.alert { Color::Red } else { Color::White };
        lines.push(Line::from(vec![
            Span::styled(format!("{}. {}: ", i + 1, step.label()), Style::default().fg(Color::Cyan)),
            Span::styled(step.conclusion.clone(), Style::default().fg(color)),
        ]));
    }

    let summary = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .wrap(Wrap { trim: true });
    f.render_widget(summary, chunks[0]);

    let rows = result.journal_entries.iter().map(|entry| {
        let color = match entry.side {
            EntrySide::Debit => Color::White,
            EntrySide::Credit => Color::Cyan,
        };
        Row::new(vec![
            Cell::from(entry.section.clone().unwrap_or_default()),
            Cell::from(entry.label()),
            Cell::from(format_currency(entry.amount)),
        ])
        .style(Style::default().fg(color))
    });

    let entries = Table::new(
        rows,
        [Constraint::Length(14), Constraint::Min(24), Constraint::Length(16)],
    )
    .header(
        Row::new(vec!["Section", "Account", "Amount"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Journal Entries "));
    f.render_widget(entries, chunks[1]);
}

fn render_memo(f: &mut Frame, area: Rect, app: &App) {
    let text = app
        .memo_text()
        .unwrap_or_else(|| "No analysis yet. Run the analysis to generate the memo.".to_string());

    let memo = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Accounting Memo "))
        .wrap(Wrap { trim: false })
        .scroll((app.memo_scroll, 0));
    f.render_widget(memo, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let keys = match app.current_page {
        Page::Input => "↑↓ field  ←→ choose  F5 analyze  Tab page  Esc quit",
        Page::Memo => "↑↓ scroll  s save  F5 analyze  Tab page  q quit",
        _ => "F5 analyze  Tab page  q quit",
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(keys, Style::default().fg(Color::DarkGray)),
        Span::raw("  |  "),
        Span::styled(app.status.clone(), Style::default().fg(Color::White)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<18}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(MemoFormatter::default(), std::env::temp_dir())
    }

    fn select(app: &mut App, field: Field) {
        app.selected_field = Field::ALL.iter().position(|f| *f == field).unwrap();
    }

    #[test]
    fn test_typing_and_cycling() {
        let mut app = app();

        select(&mut app, Field::TransactionPrice);
        app.type_char('1');
        app.type_char('5');
        app.type_char('x');
        app.backspace();
        assert_eq!(app.form.transaction_price, "15");

        select(&mut app, Field::SellerType);
        app.type_char('z');
        assert_eq!(app.form.seller_type, "");
        app.cycle_choice(true);
        assert_eq!(app.form.seller_type, "current_employee");
        app.cycle_choice(false);
        app.cycle_choice(false);
        assert_eq!(app.form.seller_type, "investor");
    }

    #[test]
    fn test_run_analysis_moves_to_results() {
        let mut app = app();
        app.form = RawTransactionInput {
            transaction_price: "15".to_string(),
            fair_value: "10".to_string(),
            number_of_shares: "1000".to_string(),
            seller_type: "current_employee".to_string(),
            buyer_type: "entity".to_string(),
            ..Default::default()
        };

        assert!(app.memo_text().is_none());
        app.run_analysis();

        assert_eq!(app.current_page, Page::Results);
        assert!(app.visited(DecisionPoint::BuyerType));
        assert!(!app.visited(DecisionPoint::ShareMaturity));
        assert!(app.memo_text().unwrap().contains("COMPENSATORY"));
    }

    #[test]
    fn test_run_analysis_reports_missing_seller() {
        let mut app = app();
        app.run_analysis();

        assert!(app.analysis.is_none());
        assert_eq!(app.current_page, Page::Input);
        assert!(app.status.contains("sellerType"));
    }

    #[test]
    fn test_field_relevance() {
        let mut form = RawTransactionInput {
            seller_type: "founder".to_string(),
            buyer_type: "related_party".to_string(),
            ..Default::default()
        };
        assert!(Field::EconomicInterest.is_relevant(&form));
        assert!(!Field::HasPattern.is_relevant(&form));

        form.share_status = "immature".to_string();
        assert!(Field::HasPattern.is_relevant(&form));

        form.seller_type = "investor".to_string();
        assert!(!Field::HasPattern.is_relevant(&form));
        assert!(!Field::EconomicInterest.is_relevant(&form));
    }
}
