//! App: terminal lifecycle, the event loop and action dispatch.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use heritage_core::{Session, TimerTag, View};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        category_bar::CategoryBar, slideshow::Slideshow, story_detail::StoryDetail,
        story_list::StoryList,
    },
    theme::C_BG,
    widgets::{
        progress_bar::draw_now_playing,
        status_bar::{draw_keys_bar, InputMode},
        toast::ToastManager,
    },
};

/// Height of the slideshow pane above the story list.
const SLIDESHOW_HEIGHT: u16 = 6;

pub enum AppMessage {
    Event(Event),
}

pub struct App {
    state: AppState,
    category_bar: CategoryBar,
    story_list: StoryList,
    story_detail: StoryDetail,
    slideshow: Slideshow,
    toast: ToastManager,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let state = AppState::new(session);
        let mut story_list = StoryList::new();
        story_list.sync(&state);
        Self {
            state,
            category_bar: CategoryBar::new(),
            story_list,
            story_detail: StoryDetail::new(),
            slideshow: Slideshow::new(),
            toast: ToastManager::new(),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut timer_rx: mpsc::UnboundedReceiver<TimerTag>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, &mut timer_rx).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        // Timers go first so nothing fires into a restored terminal.
        self.state.session.teardown();
        match serde_json::to_string(&self.state.session.snapshot()) {
            Ok(json) => debug!("final session: {}", json),
            Err(e) => warn!("snapshot encode failed: {}", e),
        }
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("heritage exiting");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        timer_rx: &mut mpsc::UnboundedReceiver<TimerTag>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        // Polls so the thread notices the loop has gone away.
        tokio::task::spawn_blocking(move || loop {
            if tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(200)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        // Toast expiry and component maintenance.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                    // Drain a burst (held keys) before the next frame.
                    while let Ok(next) = rx.try_recv() {
                        needs_redraw |= self.handle_message(next);
                    }
                }

                Some(tag) = timer_rx.recv() => {
                    needs_redraw = self.state.session.handle_timer(tag);
                }

                _ = ui_tick.tick() => {
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.category_bar.tick(s));
                        all.extend(self.story_list.tick(s));
                        all.extend(self.story_detail.tick(s));
                        all.extend(self.slideshow.tick(s));
                        all
                    };
                    needs_redraw = !tick_actions.is_empty();
                    for action in tick_actions {
                        self.dispatch(action);
                    }
                    needs_redraw |= self.toast.tick();
                }
            }
        }
        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    /// Returns whether the frame needs redrawing.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
        }
    }

    // ── Key routing ───────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        // The search bar swallows everything while it is open.
        if self.state.input_mode == InputMode::Search {
            return self.story_list.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            KeyCode::Char('[') | KeyCode::Char(']') => {
                return self.category_bar.handle_key(key, &self.state);
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                return self.category_bar.handle_key(key, &self.state);
            }
            KeyCode::Char('<' | '>' | ',' | '.' | 'a') => {
                return self.slideshow.handle_key(key, &self.state);
            }
            _ => {}
        }

        match self.focused() {
            ComponentId::StoryDetail => self.story_detail.handle_key(key, &self.state),
            _ => self.story_list.handle_key(key, &self.state),
        }
    }

    /// The panel that receives unbound keys: whichever view is on screen.
    fn focused(&self) -> ComponentId {
        match self.state.session.view() {
            View::List => self.story_list.id(),
            View::Detail(_) => self.story_detail.id(),
        }
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Apply an action, then let every component react.  Follow-up actions
    /// are queued and handled in order.
    fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            debug!("dispatch: {:?}", action);
            self.apply_action(&action);
            let s = &self.state;
            queue.extend(self.category_bar.on_action(&action, s));
            queue.extend(self.story_list.on_action(&action, s));
            queue.extend(self.story_detail.on_action(&action, s));
            queue.extend(self.slideshow.on_action(&action, s));
        }
    }

    fn apply_action(&mut self, action: &Action) {
        let session = &mut self.state.session;
        match action {
            Action::SetCategory(filter) => session.set_category(*filter),
            Action::NextCategory => {
                let next = session.filter().category.next();
                session.set_category(next);
            }
            Action::PrevCategory => {
                let prev = session.filter().category.prev();
                session.set_category(prev);
            }

            Action::OpenFilter => self.state.input_mode = InputMode::Search,
            Action::CloseFilter => self.state.input_mode = InputMode::Normal,
            Action::FilterChanged(term) => session.set_search_term(term.clone()),
            Action::ClearFilter => {
                session.clear_search();
                self.state.input_mode = InputMode::Normal;
            }

            Action::Open(id) => session.open(*id),
            Action::Close => session.close(),
            Action::Play(id) => session.play(*id),

            Action::SlideNext => session.carousel_next(),
            Action::SlidePrev => session.carousel_previous(),
            Action::ToggleAutoAdvance => {
                let enabled = !session.carousel().auto_advance_enabled;
                session.set_carousel_auto_advance(enabled);
                self.toast
                    .info(if enabled { "slides: auto-advance on" } else { "slides: auto-advance off" });
            }

            Action::Share(id) => {
                let Some(text) = session.catalog().get(*id).map(|item| item.share_text()) else {
                    return;
                };
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.warning(format!("clipboard unavailable: {}", e));
                    }
                }
            }

            Action::ToggleKeys => self.state.show_keys_bar = !self.state.show_keys_bar,
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let now_playing = self.state.now_playing().is_some();
        let mut constraints = vec![Constraint::Length(1), Constraint::Min(0)];
        if now_playing {
            constraints.push(Constraint::Length(1));
        }
        if self.state.show_keys_bar {
            constraints.push(Constraint::Length(1));
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let focus = self.focused();
        let s = &self.state;
        let has_focus = |c: &dyn Component| c.id() == focus;
        let bar_focus = has_focus(&self.category_bar);
        self.category_bar.draw(frame, rows[0], bar_focus, s);

        match s.session.view() {
            View::List => {
                let body = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(SLIDESHOW_HEIGHT), Constraint::Min(0)])
                    .split(rows[1]);
                let (show_focus, list_focus) =
                    (has_focus(&self.slideshow), has_focus(&self.story_list));
                self.slideshow.draw(frame, body[0], show_focus, s);
                self.story_list.draw(frame, body[1], list_focus, s);
            }
            View::Detail(_) => {
                let detail_focus = has_focus(&self.story_detail);
                self.story_detail.draw(frame, rows[1], detail_focus, s);
            }
        }

        let mut next_row = 2;
        if let Some((item, playback)) = s.now_playing() {
            draw_now_playing(frame, rows[next_row], item, playback);
            next_row += 1;
        }
        if s.show_keys_bar {
            draw_keys_bar(frame, rows[next_row], s.input_mode, s.session.view());
        }

        self.toast.draw(frame, area);
    }
}
