use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::config::DeletionStrategy;
use crate::tui::selection::SelectionState;
use crate::tui::theme::{Theme, Tone};
use crate::utils::format_size;

/// 选择屏幕 - 负责绘制多选列表和确认对话框
pub struct SelectScreen {
    /// 列表状态
    list_state: ListState,
}

impl SelectScreen {
    /// 创建新的选择屏幕
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
        }
    }

    /// 绘制多选列表
    pub fn draw_selection(&mut self, f: &mut Frame, area: Rect, selection: &SelectionState, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // 列表
                Constraint::Length(1), // 选中汇总
                Constraint::Length(1), // 帮助栏
            ])
            .split(area);

        let items: Vec<ListItem> = selection
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mark = if selection.is_checked(i) { "[x]" } else { "[ ]" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", mark), theme.tui_style(Tone::Success)),
                    Span::styled(format!("{} - ", i + 1), theme.tui_style(Tone::Item)),
                    Span::styled(item.display_path.clone(), theme.tui_style(Tone::Item)),
                    Span::raw(" "),
                    Span::styled(format!("({})", item.formatted_size), theme.tui_style(Tone::Size)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" 📂 选择要删除的目录 ")
                    .title_style(theme.tui_style(Tone::Title)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        self.list_state.select(Some(selection.cursor()));
        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let summary = Paragraph::new(format!(
            " 已选择 {} / {} 个目录，共 {}",
            selection.selected_count(),
            selection.len(),
            format_size(selection.selected_size())
        ))
        .style(theme.tui_style(Tone::Success));
        f.render_widget(summary, chunks[1]);

        let help = Paragraph::new(" ↑/↓ 移动  空格 勾选  a 全选  Enter 确认  q/Esc 退出")
            .style(theme.tui_style(Tone::Dim));
        f.render_widget(help, chunks[2]);
    }

    /// 绘制删除确认对话框
    pub fn draw_confirm_dialog(
        &mut self,
        f: &mut Frame,
        area: Rect,
        selection: &SelectionState,
        theme: &Theme,
        strategy: DeletionStrategy,
    ) {
        let popup_area = centered_rect(area, 60, 9);
        f.render_widget(Clear, popup_area);

        let warning = match strategy {
            DeletionStrategy::Permanent => "此操作无法撤销",
            DeletionStrategy::Trash => "目录将被移动到回收站",
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("⚠️  已选择 {} 个目录", selection.selected_count()),
                theme.tui_style(Tone::Warning),
            )),
            Line::from(Span::styled(
                format!("💾 将释放空间: {}", format_size(selection.selected_size())),
                theme.tui_style(Tone::Success),
            )),
            Line::from(Span::styled(warning, theme.tui_style(Tone::Dim))),
            Line::from(""),
            Line::from(vec![
                Span::styled("[Y]", theme.tui_style(Tone::Success)),
                Span::raw(" 确认删除  "),
                Span::styled("[N/Esc]", theme.tui_style(Tone::Error)),
                Span::raw(" 取消"),
            ]),
        ];

        let popup = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.tui_style(Tone::Error))
                    .title(" 确认删除 ")
                    .title_style(theme.tui_style(Tone::Error)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(popup, popup_area);
    }
}

impl Default for SelectScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// 计算居中的弹窗区域
fn centered_rect(area: Rect, percent_width: u16, height: u16) -> Rect {
    let width = ((area.width as u32 * percent_width as u32 / 100) as u16)
        .max(40)
        .min(area.width.saturating_sub(4).max(1));
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
