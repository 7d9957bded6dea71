use crossterm::style::{self, Stylize};

/// RGB 颜色，可同时用于控制台输出和 TUI 绘制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn console(self) -> style::Color {
        style::Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }

    pub fn tui(self) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(self.0, self.1, self.2)
    }
}

/// 输出配色
///
/// 作为参数传给各个展示组件，扫描逻辑本身不依赖它。
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Rgb,
    pub item: Rgb,
    pub path: Rgb,
    pub size: Rgb,
    pub success: Rgb,
    pub warning: Rgb,
    pub error: Rgb,
    pub dim: Rgb,

    /// 关闭后输出纯文本
    pub colored: bool,
}

/// 文本样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Item,
    Path,
    Size,
    Success,
    Warning,
    Error,
    Dim,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Rgb(0x01, 0xFA, 0xC6),
            item: Rgb(0xFA, 0xFA, 0xFA),
            path: Rgb(0x62, 0x62, 0x62),
            size: Rgb(0x04, 0xB5, 0x75),
            success: Rgb(0x04, 0xB5, 0x75),
            warning: Rgb(0xFF, 0xAA, 0x00),
            error: Rgb(0xFF, 0x44, 0x44),
            dim: Rgb(0x62, 0x62, 0x62),
            colored: true,
        }
    }
}

impl Theme {
    /// 不带颜色的主题，用于非终端输出和测试
    pub fn plain() -> Self {
        Self {
            colored: false,
            ..Self::default()
        }
    }

    /// 根据环境选择主题，设置了 NO_COLOR 时不使用颜色
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::plain()
        } else {
            Self::default()
        }
    }

    pub fn color(&self, tone: Tone) -> Rgb {
        match tone {
            Tone::Title => self.title,
            Tone::Item => self.item,
            Tone::Path => self.path,
            Tone::Size => self.size,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
            Tone::Error => self.error,
            Tone::Dim => self.dim,
        }
    }

    fn is_bold(tone: Tone) -> bool {
        matches!(
            tone,
            Tone::Title | Tone::Size | Tone::Success | Tone::Warning | Tone::Error
        )
    }

    /// 按样式渲染文本
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.colored {
            return text.to_string();
        }

        let styled = style::style(text).with(self.color(tone).console());
        if Self::is_bold(tone) {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }

    /// TUI 中使用的样式
    pub fn tui_style(&self, tone: Tone) -> ratatui::style::Style {
        let mut style = ratatui::style::Style::default();
        if self.colored {
            style = style.fg(self.color(tone).tui());
        }
        if Self::is_bold(tone) {
            style = style.add_modifier(ratatui::style::Modifier::BOLD);
        }
        style
    }
}
