use super::*;

impl App {
    /// Switch page, dropping any status message from the previous one.
    pub fn navigate_to(&mut self, view: View) {
        if view.route() != self.current_view.route() {
            tracing::debug!(from = self.current_view.route(), to = view.route(), "navigate");
        }
        self.current_view = view;
        self.clear_status();
    }

    /// Move focus down in the task list (vim-style j or down)
    pub fn task_focus_down(&mut self) {
        let count = self.visible_tasks().len();
        if count > 0 && self.focused_task_index < count - 1 {
            self.focused_task_index += 1;
        }
    }

    /// Move focus up in the task list (vim-style k or up)
    pub fn task_focus_up(&mut self) {
        self.focused_task_index = self.focused_task_index.saturating_sub(1);
    }

    pub(super) fn clamp_task_focus(&mut self) {
        let count = self.visible_tasks().len();
        if self.focused_task_index >= count {
            self.focused_task_index = count.saturating_sub(1);
        }
    }

    pub fn toggle_focused_pane(&mut self) {
        self.focused_pane = match self.focused_pane {
            FocusedPane::Tasks => FocusedPane::Calendar,
            FocusedPane::Calendar => FocusedPane::Tasks,
        };
    }

    pub fn select_date(&mut self, date: Date) {
        self.selected_date = date;
        if self.scope == TaskScope::SelectedDay {
            self.focused_task_index = 0;
        }
    }

    pub fn shift_selected_days(&mut self, days: i64) {
        self.select_date(calendar::shift_days(self.selected_date, days));
    }

    pub fn shift_selected_months(&mut self, months: i32) {
        self.select_date(calendar::shift_months(self.selected_date, months));
    }

    pub fn select_today(&mut self) {
        self.today = local_today();
        self.select_date(self.today);
    }
}
