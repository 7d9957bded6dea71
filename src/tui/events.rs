use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use anyhow::Result;
use tokio::sync::mpsc;

/// 两次轮询之间的最长等待，超时即产生一次 Tick
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 终端事件
#[derive(Clone, Debug)]
pub enum Event {
    /// 键盘按下
    Key(KeyEvent),

    /// 终端大小调整
    Resize(u16, u16),

    /// 轮询超时
    Tick,
}

/// 选择界面支持的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Up,
    Down,
    Toggle,
    ToggleAll,
    Confirm,
    Yes,
    Quit,
}

impl KeyAction {
    /// 把按键映射为操作，未绑定的按键返回 None
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') if ctrl => Some(Self::Quit),
            _ if ctrl => None,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Self::Quit),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(Self::Up),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(Self::Down),
            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Char('X') => Some(Self::Toggle),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Self::ToggleAll),
            KeyCode::Enter => Some(Self::Confirm),
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Self::Yes),
            _ => None,
        }
    }
}

/// 事件处理器 - 在阻塞线程中读取终端事件并转发到异步通道
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    sender: mpsc::UnboundedSender<Event>,

    /// 通知读取线程退出
    stop: Arc<AtomicBool>,
    reader: Option<tokio::task::JoinHandle<()>>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            stop: Arc::new(AtomicBool::new(false)),
            reader: None,
        }
    }

    /// 启动读取线程
    ///
    /// `spawn_blocking` 的任务无法被 abort，因此用标志位让它在下一次轮询后自行退出。
    pub fn start(&mut self) {
        let sender = self.sender.clone();
        let stop = Arc::clone(&self.stop);
        stop.store(false, Ordering::SeqCst);

        self.reader = Some(tokio::task::spawn_blocking(move || {
            while !stop.load(Ordering::SeqCst) {
                let next = match event::poll(POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Ok(event::Event::Resize(w, h)) => Event::Resize(w, h),
                        Ok(_) => continue,
                        Err(err) => {
                            tracing::error!("读取终端事件失败: {}", err);
                            break;
                        }
                    },
                    Ok(false) => Event::Tick,
                    Err(err) => {
                        tracing::error!("轮询终端事件失败: {}", err);
                        break;
                    }
                };

                if sender.send(next).is_err() {
                    break;
                }
            }
        }));
    }

    /// 接收下一个事件
    pub async fn next(&mut self) -> Result<Event> {
        self.receiver.recv().await
            .ok_or_else(|| anyhow::anyhow!("事件通道已关闭"))
    }

    /// 停止读取线程
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        self.reader.take();
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop();
    }
}
