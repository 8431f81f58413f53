//! Back/forward tracking
//!
//! The renderer does not expose its session history, so the shell mirrors it
//! from committed page loads. A traversal requested by the user is recorded as
//! pending and resolved by the next committed load.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Back,
    Forward,
    Reload,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    back: Vec<String>,
    current: Option<String>,
    forward: Vec<String>,
    pending: Option<Traversal>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// URL a traversal would land on, if it is possible
    pub fn target(&self, traversal: Traversal) -> Option<&str> {
        match traversal {
            Traversal::Back => self.back.last(),
            Traversal::Forward => self.forward.last(),
            Traversal::Reload => self.current.as_ref(),
        }
        .map(String::as_str)
    }

    /// Record a traversal the renderer is about to perform.
    ///
    /// Returns false, and records nothing, when the traversal is impossible.
    pub fn request(&mut self, traversal: Traversal) -> bool {
        let possible = self.target(traversal).is_some();
        if possible {
            self.pending = Some(traversal);
        }
        possible
    }

    /// Apply a committed page load.
    ///
    /// A pending traversal only counts when `url` is the entry it leads to;
    /// any other load is a new navigation. Either way the pending traversal
    /// is consumed.
    pub fn commit(&mut self, url: &str) {
        let pending = self.pending.take();

        if pending == Some(Traversal::Back) && self.target(Traversal::Back) == Some(url) {
            self.back.pop();
            if let Some(current) = self.current.replace(url.to_string()) {
                self.forward.push(current);
            }
        } else if pending == Some(Traversal::Forward)
            && self.target(Traversal::Forward) == Some(url)
        {
            self.forward.pop();
            if let Some(current) = self.current.replace(url.to_string()) {
                self.back.push(current);
            }
        } else if self.current.as_deref() != Some(url) {
            if let Some(current) = self.current.replace(url.to_string()) {
                self.back.push(current);
            }
            self.forward.clear();
        }

        tracing::trace!(
            url = %url,
            back = self.back.len(),
            forward = self.forward.len(),
            "History commit"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(history: &mut NavigationHistory, urls: &[&str]) {
        for url in urls {
            history.commit(url);
        }
    }

    #[test]
    fn test_fresh_history() {
        let mut history = NavigationHistory::new();
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
        assert!(!history.request(Traversal::Back));
        assert!(!history.request(Traversal::Reload));

        history.commit("https://a");
        assert_eq!(history.target(Traversal::Reload), Some("https://a"));
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = NavigationHistory::new();
        visit(&mut history, &["https://a", "https://b", "https://c"]);
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());

        assert!(history.request(Traversal::Back));
        history.commit("https://b");
        assert_eq!(history.target(Traversal::Reload), Some("https://b"));
        assert!(history.can_go_back());
        assert!(history.can_go_forward());

        assert!(history.request(Traversal::Back));
        history.commit("https://a");
        assert!(!history.can_go_back());
        assert!(history.can_go_forward());

        assert!(history.request(Traversal::Forward));
        history.commit("https://b");
        assert_eq!(history.target(Traversal::Reload), Some("https://b"));
        assert!(history.can_go_back());
        assert!(history.can_go_forward());
    }

    #[test]
    fn test_new_navigation_clears_forward() {
        let mut history = NavigationHistory::new();
        visit(&mut history, &["https://a", "https://b"]);

        assert!(history.request(Traversal::Back));
        history.commit("https://a");
        assert!(history.can_go_forward());

        history.commit("https://d");
        assert!(!history.can_go_forward());
        assert!(history.can_go_back());
    }

    #[test]
    fn test_reload_and_repeat_do_not_grow_history() {
        let mut history = NavigationHistory::new();
        visit(&mut history, &["https://a", "https://a"]);
        assert!(!history.can_go_back());

        assert!(history.request(Traversal::Reload));
        history.commit("https://a");
        assert!(!history.can_go_back());
        assert_eq!(history.target(Traversal::Reload), Some("https://a"));
    }

    #[test]
    fn test_traversal_targets() {
        let mut history = NavigationHistory::new();
        assert_eq!(history.target(Traversal::Reload), None);

        visit(&mut history, &["https://a", "https://b"]);
        assert_eq!(history.target(Traversal::Back), Some("https://a"));
        assert_eq!(history.target(Traversal::Forward), None);
        assert_eq!(history.target(Traversal::Reload), Some("https://b"));
    }

    #[test]
    fn test_unrelated_load_after_back_is_a_new_navigation() {
        let mut history = NavigationHistory::new();
        visit(&mut history, &["https://a", "https://b"]);

        // The back never happened; a different page loaded instead
        assert!(history.request(Traversal::Back));
        history.commit("https://c");

        assert_eq!(history.target(Traversal::Reload), Some("https://c"));
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
        assert_eq!(history.target(Traversal::Back), Some("https://b"));

        // The stale request does not apply to later loads either
        history.commit("https://b");
        assert_eq!(history.target(Traversal::Back), Some("https://c"));
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_unrelated_load_after_forward_is_a_new_navigation() {
        let mut history = NavigationHistory::new();
        visit(&mut history, &["https://a", "https://b"]);
        assert!(history.request(Traversal::Back));
        history.commit("https://a");

        assert!(history.request(Traversal::Forward));
        history.commit("https://d");
        assert_eq!(history.target(Traversal::Reload), Some("https://d"));
        assert!(!history.can_go_forward());
        assert_eq!(history.target(Traversal::Back), Some("https://a"));
    }
}
