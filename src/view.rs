// Presentation adapter between a display surface and the task store

use crate::error::as_validation;
use crate::filter::Filter;
use crate::messages::Messages;
use crate::models::Task;
use crate::slot::Slot;
use crate::store::TaskStore;
use eyre::Result;
use tracing::debug;

/// One displayed task.
///
/// `id` identifies the task when the surface reports a toggle or delete
/// activation for this row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub completed: bool,
    pub text: String,
}

/// A rendering target for the task list
pub trait Surface {
    /// Replace everything displayed with `rows`
    fn replace_rows(&mut self, rows: &[Row]);

    /// Replace everything displayed with a single placeholder
    fn show_empty(&mut self, message: &str);

    fn set_count_label(&mut self, label: &str);

    /// Highlight the control for `active`, un-highlight the others
    fn mark_filter(&mut self, active: Filter);

    /// Blocking notification to the user
    fn notify(&mut self, message: &str);

    /// Clear the input field and return focus to it
    fn reset_input(&mut self) {}
}

/// Discrete user interactions coming from a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Add(String),
    EnterKey(String),
    Toggle(i64),
    Delete(i64),
    ClearCompleted,
    SelectFilter(Filter),
}

/// Drives a surface from a task store and feeds surface events back into it
pub struct Presenter<S: Slot, V: Surface> {
    store: TaskStore<S>,
    surface: V,
    messages: Messages,
}

impl<S: Slot, V: Surface> Presenter<S, V> {
    pub fn new(store: TaskStore<S>, surface: V, messages: Messages) -> Self {
        Self {
            store,
            surface,
            messages,
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    pub fn into_parts(self) -> (TaskStore<S>, V) {
        (self.store, self.surface)
    }

    /// Initial paint
    pub fn refresh(&mut self) {
        self.surface.mark_filter(self.store.filter());
        self.render();
        self.update_count();
    }

    /// Redraw the rows for the current filter
    pub fn render(&mut self) {
        let rows: Vec<Row> = self
            .store
            .filtered_view()
            .into_iter()
            .map(|t| Row {
                id: t.id,
                completed: t.completed,
                text: t.text.clone(),
            })
            .collect();

        if rows.is_empty() {
            self.surface.show_empty(self.messages.empty_state);
            return;
        }

        self.surface.replace_rows(&rows);
    }

    /// Redraw the active-task count label
    pub fn update_count(&mut self) {
        let label = self.messages.count_label(self.store.active_count());
        self.surface.set_count_label(&label);
    }

    /// Add a task and redraw. Rejected text is reported to the user and
    /// yields `None`.
    pub fn add(&mut self, text: &str) -> Result<Option<Task>> {
        let task = match self.store.add(text) {
            Ok(task) => task,
            Err(e) if as_validation(&e).is_some() => {
                self.surface.notify(self.messages.empty_text);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.render();
        self.update_count();
        self.surface.reset_input();
        Ok(Some(task))
    }

    /// Apply one user event
    pub fn handle(&mut self, event: UiEvent) -> Result<()> {
        debug!(?event, "Handling UI event");

        match event {
            UiEvent::Add(text) | UiEvent::EnterKey(text) => {
                self.add(&text)?;
            }
            UiEvent::Toggle(id) => {
                self.store.toggle(id)?;
                self.render();
                self.update_count();
            }
            UiEvent::Delete(id) => {
                self.store.delete(id)?;
                self.render();
                self.update_count();
            }
            UiEvent::ClearCompleted => {
                self.store.clear_completed()?;
                self.render();
                self.update_count();
            }
            UiEvent::SelectFilter(filter) => {
                self.store.set_filter(filter);
                self.surface.mark_filter(filter);
                self.render();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::messages::Lang;
    use crate::slot::MemorySlot;
    use crate::store::DEFAULT_KEY;

    /// What a surface was last told to show
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub rows: Vec<Row>,
        pub empty: Option<String>,
        pub count: Option<String>,
        pub filter: Option<Filter>,
        pub notices: Vec<String>,
        pub renders: usize,
        pub count_updates: usize,
        pub input_resets: usize,
    }

    impl Surface for RecordingSurface {
        fn replace_rows(&mut self, rows: &[Row]) {
            self.rows = rows.to_vec();
            self.empty = None;
            self.renders += 1;
        }

        fn show_empty(&mut self, message: &str) {
            self.rows.clear();
            self.empty = Some(message.to_string());
            self.renders += 1;
        }

        fn set_count_label(&mut self, label: &str) {
            self.count = Some(label.to_string());
            self.count_updates += 1;
        }

        fn mark_filter(&mut self, active: Filter) {
            self.filter = Some(active);
        }

        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }

        fn reset_input(&mut self) {
            self.input_resets += 1;
        }
    }

    fn presenter() -> Presenter<MemorySlot, RecordingSurface> {
        let store = TaskStore::open(MemorySlot::new(), DEFAULT_KEY).unwrap();
        let mut p = Presenter::new(store, RecordingSurface::default(), Messages::for_lang(Lang::En));
        p.refresh();
        p
    }

    fn texts(surface: &RecordingSurface) -> Vec<&str> {
        surface.rows.iter().map(|r| r.text.as_str()).collect()
    }

    fn id_of(p: &Presenter<MemorySlot, RecordingSurface>, text: &str) -> i64 {
        p.store().tasks().iter().find(|t| t.text == text).unwrap().id
    }

    #[test]
    fn test_refresh_on_empty_store() {
        let p = presenter();
        let s = p.surface();
        assert_eq!(s.empty.as_deref(), Some("No tasks found"));
        assert_eq!(s.count.as_deref(), Some("0 tasks"));
        assert_eq!(s.filter, Some(Filter::All));
    }

    #[test]
    fn test_add_renders_counts_and_resets_input() {
        let mut p = presenter();
        p.handle(UiEvent::Add("  Buy milk ".to_string())).unwrap();

        let s = p.surface();
        assert_eq!(texts(s), vec!["Buy milk"]);
        assert!(s.empty.is_none());
        assert_eq!(s.count.as_deref(), Some("1 task"));
        assert_eq!(s.input_resets, 1);
    }

    #[test]
    fn test_add_reports_outcome() {
        let mut p = presenter();
        let task = p.add(" Pay rent ").unwrap().unwrap();
        assert_eq!(task.text, "Pay rent");
        assert_eq!(p.store().get(task.id), Some(&task));

        assert_eq!(p.add("  ").unwrap(), None);
        assert_eq!(p.surface().notices.len(), 1);
        assert_eq!(p.store().len(), 1);
    }

    #[test]
    fn test_enter_key_adds_like_button() {
        let mut p = presenter();
        p.handle(UiEvent::EnterKey("Walk dog".to_string())).unwrap();
        assert_eq!(texts(p.surface()), vec!["Walk dog"]);
    }

    #[test]
    fn test_empty_add_notifies_without_redraw() {
        let mut p = presenter();
        let renders = p.surface().renders;

        p.handle(UiEvent::Add("   ".to_string())).unwrap();

        let s = p.surface();
        assert_eq!(s.notices, vec!["Please enter a task!".to_string()]);
        assert_eq!(s.renders, renders);
        assert_eq!(s.input_resets, 0);
        assert!(p.store().is_empty());
    }

    #[test]
    fn test_rows_reflect_completion() {
        let mut p = presenter();
        p.handle(UiEvent::Add("a".to_string())).unwrap();
        let id = id_of(&p, "a");

        p.handle(UiEvent::Toggle(id)).unwrap();
        assert_eq!(
            p.surface().rows,
            vec![Row {
                id,
                completed: true,
                text: "a".to_string()
            }]
        );
        assert_eq!(p.surface().count.as_deref(), Some("0 tasks"));
    }

    #[test]
    fn test_markup_text_is_passed_verbatim() {
        let mut p = presenter();
        let payload = "<img src=x onerror=alert(1)>";
        p.handle(UiEvent::Add(payload.to_string())).unwrap();
        assert_eq!(texts(p.surface()), vec![payload]);
    }

    #[test]
    fn test_filter_change_does_not_recount() {
        let mut p = presenter();
        p.handle(UiEvent::Add("a".to_string())).unwrap();
        let counts = p.surface().count_updates;

        p.handle(UiEvent::SelectFilter(Filter::Completed)).unwrap();

        let s = p.surface();
        assert_eq!(s.count_updates, counts);
        assert_eq!(s.filter, Some(Filter::Completed));
        assert_eq!(s.empty.as_deref(), Some("No tasks found"));
    }

    #[test]
    fn test_delete_and_clear_completed() {
        let mut p = presenter();
        for text in ["a", "b", "c"] {
            p.handle(UiEvent::Add(text.to_string())).unwrap();
        }
        let a = id_of(&p, "a");
        let b = id_of(&p, "b");

        p.handle(UiEvent::Delete(a)).unwrap();
        assert_eq!(texts(p.surface()), vec!["b", "c"]);

        p.handle(UiEvent::Toggle(b)).unwrap();
        p.handle(UiEvent::ClearCompleted).unwrap();
        assert_eq!(texts(p.surface()), vec!["c"]);
        assert_eq!(p.surface().count.as_deref(), Some("1 task"));
    }

    #[test]
    fn test_unknown_ids_are_silent() {
        let mut p = presenter();
        p.handle(UiEvent::Add("a".to_string())).unwrap();

        p.handle(UiEvent::Toggle(-1)).unwrap();
        p.handle(UiEvent::Delete(-1)).unwrap();

        assert!(p.surface().notices.is_empty());
        assert_eq!(texts(p.surface()), vec!["a"]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut p = presenter();
        p.handle(UiEvent::Add("Buy milk".to_string())).unwrap();
        p.handle(UiEvent::Add("Walk dog".to_string())).unwrap();
        let milk = id_of(&p, "Buy milk");
        p.handle(UiEvent::Toggle(milk)).unwrap();

        p.handle(UiEvent::SelectFilter(Filter::Active)).unwrap();
        assert_eq!(texts(p.surface()), vec!["Walk dog"]);

        p.handle(UiEvent::SelectFilter(Filter::Completed)).unwrap();
        assert_eq!(texts(p.surface()), vec!["Buy milk"]);

        p.update_count();
        assert_eq!(p.surface().count.as_deref(), Some("1 task"));
    }

    #[test]
    fn test_portuguese_messages() {
        let store = TaskStore::open(MemorySlot::new(), DEFAULT_KEY).unwrap();
        let mut p = Presenter::new(store, RecordingSurface::default(), Messages::for_lang(Lang::Pt));
        p.refresh();
        assert_eq!(p.surface().empty.as_deref(), Some("Nenhuma tarefa encontrada"));
        assert_eq!(p.surface().count.as_deref(), Some("0 tarefas"));

        p.handle(UiEvent::Add(String::new())).unwrap();
        assert_eq!(p.surface().notices, vec!["Por favor, digite uma tarefa!".to_string()]);
    }
}
