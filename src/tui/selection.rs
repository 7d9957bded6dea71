use crate::models::DisplayRecord;

/// 多选列表的状态
#[derive(Debug, Clone)]
pub struct SelectionState {
    items: Vec<DisplayRecord>,
    checked: Vec<bool>,
    cursor: usize,
}

impl SelectionState {
    pub fn new(items: Vec<DisplayRecord>) -> Self {
        let checked = vec![false; items.len()];
        Self {
            items,
            checked,
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[DisplayRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// 切换光标所在项
    pub fn toggle(&mut self) {
        if let Some(checked) = self.checked.get_mut(self.cursor) {
            *checked = !*checked;
        }
    }

    /// 全部选中；如果已经全部选中则全部取消
    pub fn toggle_all(&mut self) {
        let select = !self.checked.iter().all(|c| *c);
        self.checked.iter_mut().for_each(|c| *c = select);
    }

    /// 选中项的下标，按列表顺序
    pub fn selected_indices(&self) -> Vec<usize> {
        self.checked
            .iter()
            .enumerate()
            .filter(|(_, checked)| **checked)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }

    /// 选中项的总大小
    pub fn selected_size(&self) -> u64 {
        self.items
            .iter()
            .zip(self.checked.iter())
            .filter(|(_, checked)| **checked)
            .fold(0u64, |acc, (item, _)| acc.saturating_add(item.size_bytes))
    }
}
