use std::io;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    execute,
};
use crossterm::event::KeyEvent;
use anyhow::Result;

use crate::config::DeletionStrategy;
use crate::models::DisplayRecord;
use crate::tui::events::{Event, EventHandler, KeyAction};
use crate::tui::screens::SelectScreen;
use crate::tui::selection::SelectionState;
use crate::tui::theme::Theme;

type CrosstermTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// 进入备用屏幕，离开作用域时无论成功与否都恢复终端
struct TerminalGuard {
    terminal: CrosstermTerminal,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// 应用程序状态
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// 选择要删除的目录
    Selecting,

    /// 确认对话框
    Confirming,

    /// 已结束
    Done(SelectionOutcome),
}

/// 交互选择的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// 用户确认删除这些下标对应的目录（可能为空）
    Confirmed(Vec<usize>),

    /// 用户在任意一步取消
    Cancelled,
}

/// 交互式选择界面
pub struct App {
    /// 当前状态
    state: AppState,

    /// 列表选择状态
    selection: SelectionState,

    /// 配色
    theme: Theme,

    /// 删除方式，只影响确认对话框中的提示
    strategy: DeletionStrategy,

    /// 事件处理器
    event_handler: EventHandler,

    /// 选择屏幕
    screen: SelectScreen,
}

impl App {
    /// 创建新的应用程序
    pub fn new(records: Vec<DisplayRecord>, theme: Theme, strategy: DeletionStrategy) -> Self {
        Self {
            state: AppState::Selecting,
            selection: SelectionState::new(records),
            theme,
            strategy,
            event_handler: EventHandler::new(),
            screen: SelectScreen::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// 运行应用程序，返回用户的选择
    pub async fn run(mut self) -> Result<SelectionOutcome> {
        let mut guard = TerminalGuard::enter()?;
        self.event_handler.start();

        let result = self.main_loop(&mut guard.terminal).await;

        self.event_handler.stop();
        drop(guard);
        result
    }

    /// 主事件循环，直到进入 Done 状态
    async fn main_loop(&mut self, terminal: &mut CrosstermTerminal) -> Result<SelectionOutcome> {
        loop {
            if let AppState::Done(outcome) = &self.state {
                return Ok(outcome.clone());
            }

            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = self.event_handler.next().await? {
                self.handle_key_event(key);
            }
        }
    }

    /// 处理键盘事件
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let Some(action) = KeyAction::from_key(&key) else {
            // 确认框中任何未绑定的按键都视为取消
            if self.state == AppState::Confirming {
                self.state = AppState::Done(SelectionOutcome::Cancelled);
            }
            return;
        };

        self.state = match (&self.state, action) {
            (AppState::Selecting, KeyAction::Quit) => AppState::Done(SelectionOutcome::Cancelled),
            (AppState::Selecting, KeyAction::Up) => {
                self.selection.previous();
                AppState::Selecting
            }
            (AppState::Selecting, KeyAction::Down) => {
                self.selection.next();
                AppState::Selecting
            }
            (AppState::Selecting, KeyAction::Toggle) => {
                self.selection.toggle();
                AppState::Selecting
            }
            (AppState::Selecting, KeyAction::ToggleAll) => {
                self.selection.toggle_all();
                AppState::Selecting
            }
            // 没有选中任何目录时直接结束，不弹确认框
            (AppState::Selecting, KeyAction::Confirm) if self.selection.selected_count() == 0 => {
                AppState::Done(SelectionOutcome::Confirmed(Vec::new()))
            }
            (AppState::Selecting, KeyAction::Confirm) => AppState::Confirming,
            (AppState::Selecting, KeyAction::Yes) => AppState::Selecting,
            (AppState::Confirming, KeyAction::Yes) => {
                AppState::Done(SelectionOutcome::Confirmed(self.selection.selected_indices()))
            }
            (AppState::Confirming, _) => AppState::Done(SelectionOutcome::Cancelled),
            (AppState::Done(outcome), _) => AppState::Done(outcome.clone()),
        };
    }

    /// 绘制界面
    pub fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        self.screen.draw_selection(f, area, &self.selection, &self.theme);

        if self.state == AppState::Confirming {
            self.screen
                .draw_confirm_dialog(f, area, &self.selection, &self.theme, self.strategy);
        }
    }
}
