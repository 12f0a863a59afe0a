use std::cell::RefCell;

use crate::error::Result;
use crate::git::Scm;

/// Mock source control for testing pipelines without a real repository.
pub struct MockScm {
    clean: bool,
    commits: RefCell<Vec<String>>,
    tags: RefCell<Vec<String>>,
}

impl MockScm {
    pub fn clean() -> Self {
        MockScm {
            clean: true,
            commits: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
        }
    }

    pub fn dirty() -> Self {
        MockScm {
            clean: false,
            commits: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
        }
    }

    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }
}

impl Scm for MockScm {
    fn is_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn force_tag(&self, name: &str) -> Result<()> {
        self.tags.borrow_mut().push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_scm_records() {
        let scm = MockScm::clean();
        assert!(scm.is_clean().unwrap());

        scm.commit_all("Bump build number").unwrap();
        scm.force_tag("1.2.0").unwrap();

        assert_eq!(scm.commits(), vec!["Bump build number"]);
        assert_eq!(scm.tags(), vec!["1.2.0"]);
    }

    #[test]
    fn test_mock_scm_dirty() {
        let scm = MockScm::dirty();
        assert!(!scm.is_clean().unwrap());
    }
}
