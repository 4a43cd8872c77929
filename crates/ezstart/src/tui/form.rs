//! サブスクリプション → リソースグループ → 種別 → リソース名 の選択フォーム

use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use ezstart_config::AppConfig;
use ezstart_core::{Event, Selection, Session, SubmitSettings, SubmitTask, TaskStatus};
use futures_util::StreamExt;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::terminal::{Tui, restore_terminal, setup_terminal};
use crate::providers;

/// フォーカス可能な項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Subscription,
    ResourceGroup,
    ResourceType,
    ResourceName,
    Start,
}

const FIELDS: [Field; 5] = [
    Field::Subscription,
    Field::ResourceGroup,
    Field::ResourceType,
    Field::ResourceName,
    Field::Start,
];

impl Field {
    fn title(&self) -> &'static str {
        match self {
            Field::Subscription => "Subscription",
            Field::ResourceGroup => "Resource Group",
            Field::ResourceType => "Resource Type",
            Field::ResourceName => "Resource Name",
            Field::Start => "Start",
        }
    }

    fn options(&self, selection: &Selection) -> Vec<String> {
        match self {
            Field::Subscription => selection.subscription_options(),
            Field::ResourceGroup => selection.resource_group_options(),
            Field::ResourceType => selection.resource_type_options(),
            Field::ResourceName => selection.resource_name_options(),
            Field::Start => Vec::new(),
        }
    }

    fn current<'a>(&self, selection: &'a Selection) -> Option<&'a str> {
        match self {
            Field::Subscription => selection.subscription_name(),
            Field::ResourceGroup => selection.resource_group(),
            Field::ResourceType => selection.resource_type_label(),
            Field::ResourceName => selection.resource_name(),
            Field::Start => None,
        }
    }

    fn is_loading(&self, selection: &Selection) -> bool {
        match self {
            Field::Subscription => selection.is_loading_subscriptions(),
            Field::ResourceGroup => selection.is_loading_resource_groups(),
            Field::ResourceName => selection.is_loading_resource_names(),
            Field::ResourceType | Field::Start => false,
        }
    }

    /// 一覧が空のときの案内
    fn placeholder(&self) -> &'static str {
        match self {
            Field::Subscription => "No subscriptions",
            Field::ResourceGroup => "Select a subscription",
            Field::ResourceType => "",
            Field::ResourceName => "Select a group and a type",
            Field::Start => "",
        }
    }

    fn select(&self, value: String) -> Option<Event> {
        match self {
            Field::Subscription => Some(Event::SubscriptionSelected(value)),
            Field::ResourceGroup => Some(Event::ResourceGroupSelected(value)),
            Field::ResourceType => Some(Event::ResourceTypeSelected(value)),
            Field::ResourceName => Some(Event::ResourceNameSelected(value)),
            Field::Start => None,
        }
    }
}

/// キー入力の結果
#[derive(Debug, PartialEq, Eq)]
enum FormAction {
    None,
    Dispatch(Event),
    Quit,
}

/// 画面側だけが持つ状態（フォーカスとカーソル）
#[derive(Debug, Clone, Default)]
struct FormState {
    focus: usize,
    cursors: [usize; 4],
}

impl FormState {
    fn focused(&self) -> Field {
        FIELDS[self.focus]
    }

    fn cursor(&self, field: Field) -> usize {
        FIELDS
            .iter()
            .position(|f| *f == field)
            .and_then(|i| self.cursors.get(i).copied())
            .unwrap_or(0)
    }

    /// 一覧が縮んだときにカーソルを範囲内に戻す
    fn clamp(&mut self, selection: &Selection) {
        for (i, cursor) in self.cursors.iter_mut().enumerate() {
            let len = FIELDS[i].options(selection).len();
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, selection: &Selection) -> FormAction {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => FormAction::Quit,
            KeyCode::Char('q') | KeyCode::Esc => FormAction::Quit,
            KeyCode::Tab => {
                self.focus = (self.focus + 1) % FIELDS.len();
                FormAction::None
            }
            KeyCode::BackTab => {
                self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len();
                FormAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(cursor) = self.cursors.get_mut(self.focus) {
                    *cursor = cursor.saturating_sub(1);
                }
                FormAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.focused().options(selection).len();
                if let Some(cursor) = self.cursors.get_mut(self.focus)
                    && *cursor + 1 < len
                {
                    *cursor += 1;
                }
                FormAction::None
            }
            KeyCode::Enter => {
                let field = self.focused();
                if field == Field::Start {
                    return FormAction::Dispatch(Event::StartRequested);
                }

                let options = field.options(selection);
                let Some(value) = options.get(self.cursor(field)).cloned() else {
                    return FormAction::None;
                };
                // 選んだら次の項目へ
                self.focus = (self.focus + 1) % FIELDS.len();
                field
                    .select(value)
                    .map(FormAction::Dispatch)
                    .unwrap_or(FormAction::None)
            }
            _ => FormAction::None,
        }
    }
}

/// サインインしてからフォームを起動
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let automation = providers::build_automation(config)?;
    let credential = providers::build_credential(config)?;

    // 代替画面に入る前にサインインを済ませる
    eprintln!("Azure にサインインしています ({})...", config.azure.auth);
    providers::sign_in(credential.as_ref()).await?;

    let inventory = providers::build_inventory(credential)?;
    let mut session = Session::new(inventory, automation, config.submit_settings());

    let mut terminal = setup_terminal()?;
    let result = run_form(&mut terminal, &mut session).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_form(terminal: &mut Tui, session: &mut Session) -> anyhow::Result<()> {
    let mut form = FormState::default();
    let mut events = EventStream::new();

    session.dispatch(Event::Mounted);

    loop {
        form.clamp(session.selection());
        terminal.draw(|f| draw_ui(f, &form, session.selection(), session.settings()))?;

        tokio::select! {
            input = events.next() => match input {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    match form.handle_key(key.code, key.modifiers, session.selection()) {
                        FormAction::Quit => break,
                        FormAction::Dispatch(event) => session.dispatch(event),
                        FormAction::None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = session.next() => {}
        }
    }

    Ok(())
}

fn draw_ui(frame: &mut Frame, form: &FormState, selection: &Selection, settings: &SubmitSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);
    draw_fields(frame, chunks[1], form, selection);
    draw_status(frame, chunks[2], form, selection, settings);
    draw_footer(frame, chunks[3]);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("ezstart")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn field_block(field: Field, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(field.title())
        .borders(Borders::ALL)
        .border_style(border)
}

fn draw_fields(frame: &mut Frame, area: Rect, form: &FormState, selection: &Selection) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (i, field) in FIELDS[..4].iter().enumerate() {
        let focused = form.focused() == *field;
        let block = field_block(*field, focused);

        if field.is_loading(selection) {
            let loading = Paragraph::new("Loading…")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(loading, columns[i]);
            continue;
        }

        let options = field.options(selection);
        if options.is_empty() {
            let empty = Paragraph::new(field.placeholder())
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, columns[i]);
            continue;
        }

        let current = field.current(selection);
        let items: Vec<ListItem> = options
            .iter()
            .map(|option| {
                if Some(option.as_str()) == current {
                    ListItem::new(Line::from(vec![
                        Span::styled("● ", Style::default().fg(Color::Green)),
                        Span::styled(
                            option.clone(),
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]))
                } else {
                    ListItem::new(format!("  {}", option))
                }
            })
            .collect();

        let highlight = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let list = List::new(items).block(block).highlight_style(highlight);
        let mut state = ListState::default().with_selected(Some(form.cursor(*field)));
        frame.render_stateful_widget(list, columns[i], &mut state);
    }
}

fn status_span(status: &TaskStatus) -> Span<'static> {
    match status {
        TaskStatus::Pending => Span::styled("pending", Style::default().fg(Color::Yellow)),
        TaskStatus::Succeeded => Span::styled("succeeded", Style::default().fg(Color::Green)),
        TaskStatus::Failed(reason) => {
            Span::styled(format!("failed: {}", reason), Style::default().fg(Color::Red))
        }
    }
}

fn draw_status(
    frame: &mut Frame,
    area: Rect,
    form: &FormState,
    selection: &Selection,
    settings: &SubmitSettings,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(20)])
        .split(area);

    let button_style = if form.focused() == Field::Start {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(vec![Line::from(""), Line::from(Span::styled("[ Start ]", button_style))])
        .alignment(Alignment::Center)
        .block(field_block(Field::Start, form.focused() == Field::Start));
    frame.render_widget(button, columns[0]);

    let mut lines = vec![Line::from(vec![
        Span::raw("workflow: "),
        Span::styled(settings.workflow_file.clone(), Style::default().fg(Color::Cyan)),
        Span::raw(format!(" @ {}   secret: ", settings.git_ref)),
        Span::styled(settings.secret_name.clone(), Style::default().fg(Color::Cyan)),
    ])];

    if let Some(banner) = selection.banner() {
        lines.push(Line::from(Span::styled(
            banner.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(submission) = selection.submission() {
        for task in [SubmitTask::Secret, SubmitTask::Workflow] {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}: ", task)),
                status_span(submission.status(task)),
            ]));
        }
    }

    let status = Paragraph::new(lines).block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, columns[1]);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new("Tab/Shift-Tab: 項目移動 | ↑↓/jk: 選択肢 | Enter: 決定・Start | q/Esc: 終了")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
