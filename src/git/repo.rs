use std::path::Path;

use git2::{Repository, StatusOptions};

use crate::error::Result;
use crate::git::Scm;

/// Real source control implementation on top of git2.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open or discover the repository containing `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }
}

impl Scm for GitRepo {
    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).recurse_untracked_dirs(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = self.repo.signature()?;
        let head = self.repo.head()?.peel_to_commit()?;

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&head],
        )?;

        Ok(())
    }

    fn force_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.tag_lightweight(name, head.as_object(), true)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepo) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        fs::write(dir.path().join("README.md"), "initial\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        drop(tree);
        drop(repo);
        let git = GitRepo::open(dir.path()).unwrap();
        (dir, git)
    }

    #[test]
    fn test_clean_after_commit_dirty_after_edit() {
        let (dir, git) = init_repo();
        assert!(git.is_clean().unwrap());

        fs::write(dir.path().join("README.md"), "changed\n").unwrap();
        assert!(!git.is_clean().unwrap());
    }

    #[test]
    fn test_untracked_file_makes_tree_dirty() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join("new.txt"), "untracked\n").unwrap();
        assert!(!git.is_clean().unwrap());
    }

    #[test]
    fn test_commit_all_restores_cleanliness() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join("README.md"), "changed\n").unwrap();

        git.commit_all("Bump build number").unwrap();
        assert!(git.is_clean().unwrap());
    }

    #[test]
    fn test_force_tag_overwrites_existing_tag() {
        let (dir, git) = init_repo();
        git.force_tag("1.2.0").unwrap();

        fs::write(dir.path().join("README.md"), "changed\n").unwrap();
        git.commit_all("Another commit").unwrap();

        // Same tag name on the new HEAD must succeed
        git.force_tag("1.2.0").unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        let tag_ref = repo.find_reference("refs/tags/1.2.0").unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(tag_ref.target().unwrap(), head.id());
    }
}
