//! Router state graph

use std::fmt;

use serde::Serialize;

use crate::domain::Category;

/// A node of the routing graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterState {
    Start,
    Classify,
    Engineer,
    Doctor,
    Lawyer,
    End,
}

impl RouterState {
    /// Specialist state handling `category`
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Engineering => Self::Engineer,
            Category::Medical => Self::Doctor,
            Category::Legal => Self::Lawyer,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "__start__",
            Self::Classify => "classifier",
            Self::Engineer => "engineer",
            Self::Doctor => "doctor",
            Self::Lawyer => "lawyer",
            Self::End => "__end__",
        }
    }

    /// Outgoing edges; only `Classify` branches
    pub fn successors(&self) -> Vec<RouterState> {
        match self {
            Self::Start => vec![Self::Classify],
            Self::Classify => Category::all().into_iter().map(Self::for_category).collect(),
            Self::Engineer | Self::Doctor | Self::Lawyer => vec![Self::End],
            Self::End => vec![],
        }
    }

    fn all() -> [RouterState; 6] {
        [
            Self::Start,
            Self::Classify,
            Self::Engineer,
            Self::Doctor,
            Self::Lawyer,
            Self::End,
        ]
    }

    /// Mermaid flowchart of the whole graph
    pub fn render_mermaid() -> String {
        let mut out = String::from("graph TD;\n");

        for state in Self::all() {
            out.push_str(&format!("    {}({});\n", state.name(), state.name()));
        }

        for state in Self::all() {
            let conditional = state.successors().len() > 1;
            for next in state.successors() {
                let arrow = if conditional { "-.->" } else { "-->" };
                out.push_str(&format!("    {} {} {};\n", state.name(), arrow, next.name()));
            }
        }

        out
    }

    /// Plain-text rendering of the graph
    pub fn render_ascii() -> String {
        let specialists: Vec<&str> = Self::Classify
            .successors()
            .iter()
            .map(|s| s.name())
            .collect();
        let width = specialists.iter().map(|s| s.len()).sum::<usize>() + 2 * 6;
        let center = |label: &str| format!("{:^width$}", label, width = width);

        let mut lines = vec![
            center(&format!("+{}+", "-".repeat(Self::Start.name().len() + 2))),
            center(&format!("| {} |", Self::Start.name())),
            center(&format!("+{}+", "-".repeat(Self::Start.name().len() + 2))),
            center("|"),
            center(&format!("[ {} ]", Self::Classify.name())),
            center("/ | \\"),
        ];
        lines.push(
            specialists
                .iter()
                .map(|s| format!("[ {} ]", s))
                .collect::<Vec<_>>()
                .join(" "),
        );
        lines.push(center("\\ | /"));
        lines.push(center(&format!("( {} )", Self::End.name())));

        lines
            .into_iter()
            .map(|l| l.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for RouterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// States visited while routing a single query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteTrace {
    visited: Vec<RouterState>,
}

impl RouteTrace {
    pub fn new() -> Self {
        Self {
            visited: vec![RouterState::Start],
        }
    }

    /// Record a transition; returns false when the edge does not exist
    pub fn advance(&mut self, next: RouterState) -> bool {
        let allowed = self
            .current()
            .map(|current| current.successors().contains(&next))
            .unwrap_or(next == RouterState::Start);

        if allowed {
            self.visited.push(next);
        }

        allowed
    }

    pub fn current(&self) -> Option<RouterState> {
        self.visited.last().copied()
    }

    pub fn visited(&self) -> &[RouterState] {
        &self.visited
    }

    pub fn is_complete(&self) -> bool {
        self.current() == Some(RouterState::End)
    }
}

impl fmt::Display for RouteTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.visited.iter().map(|s| s.name()).collect();
        f.write_str(&names.join(" -> "))
    }
}
