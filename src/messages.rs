// User-visible strings

use serde::{Deserialize, Serialize};

/// Language for labels and notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Pt,
}

/// Strings shown by the presenter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub empty_state: &'static str,
    pub empty_text: &'static str,
    pub task_singular: &'static str,
    pub task_plural: &'static str,
    pub delete: &'static str,
}

impl Messages {
    pub fn for_lang(lang: Lang) -> Self {
        match lang {
            Lang::En => Self {
                empty_state: "No tasks found",
                empty_text: "Please enter a task!",
                task_singular: "task",
                task_plural: "tasks",
                delete: "Delete",
            },
            Lang::Pt => Self {
                empty_state: "Nenhuma tarefa encontrada",
                empty_text: "Por favor, digite uma tarefa!",
                task_singular: "tarefa",
                task_plural: "tarefas",
                delete: "Deletar",
            },
        }
    }

    /// "1 task", otherwise "<n> tasks" (including 0)
    pub fn count_label(&self, n: usize) -> String {
        let noun = if n == 1 { self.task_singular } else { self.task_plural };
        format!("{} {}", n, noun)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::for_lang(Lang::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_label_english() {
        let m = Messages::for_lang(Lang::En);
        assert_eq!(m.count_label(0), "0 tasks");
        assert_eq!(m.count_label(1), "1 task");
        assert_eq!(m.count_label(2), "2 tasks");
        assert_eq!(m.count_label(11), "11 tasks");
    }

    #[test]
    fn test_count_label_portuguese() {
        let m = Messages::for_lang(Lang::Pt);
        assert_eq!(m.count_label(0), "0 tarefas");
        assert_eq!(m.count_label(1), "1 tarefa");
        assert_eq!(m.count_label(3), "3 tarefas");
    }

    #[test]
    fn test_lang_serialization() {
        assert_eq!(serde_json::to_string(&Lang::Pt).unwrap(), "\"pt\"");
        let lang: Lang = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Lang::En);
    }
}
