use tasks_api::Task;

/// Local copy of the server's task list, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop the task with `id`. Returns the removed task, if it was present.
    pub fn remove(&mut self, id: i64) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Flip completion of the task with `id`. Returns the new value.
    pub fn toggle(&mut self, id: i64) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.is_completed = !task.is_completed;
        Some(task.is_completed)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_completed).count()
    }
}
