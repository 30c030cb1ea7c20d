use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use std::io;
use std::time::Duration;

use tasks_core::{App, BannerKind, Task, TaskApi};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Form,
    DeleteConfirm,
    Help,
}

#[derive(PartialEq, Clone, Copy)]
pub enum FormField {
    Title,
    Completed,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Completed,
            FormField::Completed => FormField::Title,
        }
    }
}

pub struct Ui {
    pub app: App<TaskApi>,
    pub list_state: ListState,
    pub input_mode: InputMode,
    pub form_field: FormField,
}

impl Ui {
    pub fn new(api: TaskApi) -> Self {
        Ui {
            app: App::new(api),
            list_state: ListState::default(),
            input_mode: InputMode::Normal,
            form_field: FormField::Title,
        }
    }

    fn selected_task(&self) -> Option<Task> {
        self.list_state
            .selected()
            .and_then(|i| self.app.tasks.get(i))
            .cloned()
    }

    fn next_task(&mut self) {
        if self.app.tasks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.app.tasks.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_task(&mut self) {
        if self.app.tasks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.app.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Keep the selection inside the list after a reload shrinks it.
    fn clamp_selection(&mut self) {
        if self.app.tasks.is_empty() {
            self.list_state.select(None);
        } else {
            let i = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(i.min(self.app.tasks.len() - 1)));
        }
    }
}

pub async fn run_app(api: TaskApi) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = Ui::new(api);
    ui.app.load_tasks().await;
    ui.clamp_selection();

    let res = run_app_loop(&mut terminal, &mut ui).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ui: &mut Ui,
) -> Result<()> {
    loop {
        ui.app.tick();
        terminal.draw(|f| draw(f, ui))?;

        // Short poll so expired banners disappear without a keypress.
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match ui.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => ui.next_task(),
                KeyCode::Up | KeyCode::Char('k') => ui.previous_task(),
                KeyCode::Char('a') => {
                    ui.app.reset_form();
                    ui.form_field = FormField::Title;
                    ui.input_mode = InputMode::Form;
                }
                KeyCode::Char('e') => {
                    if let Some(task) = ui.selected_task() {
                        ui.app.start_edit(task);
                        ui.form_field = FormField::Title;
                        ui.input_mode = InputMode::Form;
                    }
                }
                KeyCode::Char('c') => {
                    if let Some(task) = ui.selected_task() {
                        ui.app.toggle_complete(task).await;
                        ui.clamp_selection();
                    }
                }
                KeyCode::Char('D') => {
                    if let Some(task) = ui.selected_task() {
                        ui.app.request_delete(task);
                        ui.input_mode = InputMode::DeleteConfirm;
                    }
                }
                KeyCode::Char('R') => {
                    ui.app.load_tasks().await;
                    ui.clamp_selection();
                }
                KeyCode::Char('?') => {
                    ui.input_mode = InputMode::Help;
                }
                _ => {}
            },
            InputMode::Form => match key.code {
                KeyCode::Enter => {
                    if ui.app.submit().await {
                        ui.input_mode = InputMode::Normal;
                        ui.clamp_selection();
                    }
                }
                KeyCode::Esc => {
                    ui.app.cancel_edit();
                    ui.input_mode = InputMode::Normal;
                }
                KeyCode::Tab => {
                    ui.form_field = ui.form_field.next();
                }
                KeyCode::Backspace if ui.form_field == FormField::Title => {
                    ui.app.draft.title.pop();
                }
                KeyCode::Char(' ') if ui.form_field == FormField::Completed => {
                    ui.app.draft.completed = !ui.app.draft.completed;
                }
                KeyCode::Char(c) if ui.form_field == FormField::Title => {
                    ui.app.draft.title.push(c);
                }
                _ => {}
            },
            InputMode::DeleteConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    ui.app.confirm_delete().await;
                    ui.input_mode = InputMode::Normal;
                    ui.clamp_selection();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    ui.app.cancel_delete();
                    ui.input_mode = InputMode::Normal;
                }
                _ => {}
            },
            InputMode::Help => match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                    ui.input_mode = InputMode::Normal;
                }
                _ => {}
            },
        }
    }
}

fn draw(f: &mut Frame, ui: &mut Ui) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let task_items: Vec<ListItem> = ui
        .app
        .tasks
        .iter()
        .map(|t| {
            let status = if t.completed { "✓" } else { " " };
            ListItem::new(Line::from(vec![
                Span::raw(format!("[{}] {}", status, t.title)),
                Span::styled(
                    format!("  {}", t.created_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let panel_title = if ui.app.loading {
        "tareas (cargando…)"
    } else {
        "tareas"
    };
    let tasks = List::new(task_items)
        .block(Block::default().title(panel_title).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    f.render_stateful_widget(tasks, chunks[0], &mut ui.list_state);

    let status = match &ui.app.banner {
        Some(banner) => {
            let color = match banner.kind {
                BannerKind::Success => Color::Green,
                BannerKind::Error => Color::Red,
            };
            Paragraph::new(banner.text.as_str()).style(Style::default().fg(color))
        }
        None => Paragraph::new(
            "a: añadir | e: editar | c: completar | D: eliminar | R: recargar | ?: ayuda | q: salir",
        )
        .style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(status, chunks[1]);

    match ui.input_mode {
        InputMode::Form => {
            let popup_area = centered_rect(60, 25, f.area());
            f.render_widget(Clear, popup_area);

            let focused = Style::default().fg(Color::Yellow);
            let blurred = Style::default().fg(Color::White);
            let check = if ui.app.draft.completed { "x" } else { " " };
            let lines = vec![
                Line::styled(
                    format!("título: {}", ui.app.draft.title),
                    if ui.form_field == FormField::Title {
                        focused
                    } else {
                        blurred
                    },
                ),
                Line::styled(
                    format!("[{check}] completada"),
                    if ui.form_field == FormField::Completed {
                        focused
                    } else {
                        blurred
                    },
                ),
                Line::raw(""),
                Line::styled(
                    "tab: campo | espacio: marcar | enter: guardar | esc: cancelar",
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            let popup_title = if ui.app.editing_task_id.is_some() {
                "editar tarea"
            } else {
                "nueva tarea"
            };
            let form = Paragraph::new(lines)
                .block(Block::default().title(popup_title).borders(Borders::ALL));
            f.render_widget(form, popup_area);
        }
        InputMode::DeleteConfirm => {
            let popup_area = centered_rect(60, 20, f.area());
            f.render_widget(Clear, popup_area);

            let task_title = ui
                .app
                .pending_delete
                .as_ref()
                .map(|t| t.title.as_str())
                .unwrap_or("tarea");
            let confirm_text = format!(
                "¿Estás seguro de que deseas eliminar esta tarea?\n\n'{task_title}'\n\ny: eliminar | n/esc: cancelar"
            );
            let confirm = Paragraph::new(confirm_text)
                .block(Block::default().title("confirmar").borders(Borders::ALL))
                .style(Style::default().fg(Color::Red));
            f.render_widget(confirm, popup_area);
        }
        InputMode::Help => {
            let popup_area = centered_rect(80, 60, f.area());
            f.render_widget(Clear, popup_area);

            let help_text = "AYUDA\n\nNavegación:\n  j/k: moverse por la lista\n\nAcciones:\n  a: nueva tarea\n  e: editar la tarea seleccionada\n  c: completar / marcar como pendiente\n  D: eliminar (pide confirmación)\n  R: recargar la lista\n  ?: mostrar/ocultar esta ayuda\n  q: salir\n\nPulsa ? o ESC para cerrar";
            let help = Paragraph::new(help_text)
                .block(Block::default().title("ayuda").borders(Borders::ALL))
                .style(Style::default().fg(Color::White));
            f.render_widget(help, popup_area);
        }
        InputMode::Normal => {}
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
