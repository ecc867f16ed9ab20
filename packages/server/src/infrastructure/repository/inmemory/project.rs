//! In-memory ProjectRepository implementation.
//!
//! The domain model doubles as the stored record here; a DBMS-backed
//! implementation would need a mapping layer between rows and entities.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Email, FileTree, Project, ProjectId, ProjectRepository, RepositoryError};

/// In-memory project store keyed by project id.
pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<String, Project>>,
}

impl InMemoryProjectRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            projects: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: Project) -> Result<(), RepositoryError> {
        let mut projects = self.projects.lock().await;
        projects.insert(project.id.as_str().to_string(), project);
        Ok(())
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, RepositoryError> {
        let projects = self.projects.lock().await;
        projects
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| RepositoryError::ProjectNotFound(id.as_str().to_string()))
    }

    async fn all_for_member(&self, member: &Email) -> Vec<Project> {
        let projects = self.projects.lock().await;
        let mut result: Vec<Project> = projects
            .values()
            .filter(|p| p.is_member(member))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        result
    }

    async fn add_users(
        &self,
        id: &ProjectId,
        users: Vec<Email>,
    ) -> Result<Project, RepositoryError> {
        let mut projects = self.projects.lock().await;
        let project = projects
            .get_mut(id.as_str())
            .ok_or_else(|| RepositoryError::ProjectNotFound(id.as_str().to_string()))?;
        project.add_users(users);
        Ok(project.clone())
    }

    async fn update_file_tree(
        &self,
        id: &ProjectId,
        file_tree: FileTree,
    ) -> Result<(), RepositoryError> {
        let mut projects = self.projects.lock().await;
        let project = projects
            .get_mut(id.as_str())
            .ok_or_else(|| RepositoryError::ProjectNotFound(id.as_str().to_string()))?;
        // whole-document overwrite: last writer wins
        project.file_tree = file_tree;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectIdFactory;

    fn email(s: &str) -> Email {
        Email::new(s.to_string()).unwrap()
    }

    fn project(name: &str, owner: &str) -> Project {
        Project::new(ProjectIdFactory::generate(), name.to_string(), email(owner))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        // given:
        let repo = InMemoryProjectRepository::new();
        let p = project("demo", "a@x.com");
        let id = p.id.clone();

        // when:
        repo.create(p).await.unwrap();

        // then:
        let loaded = repo.get(&id).await.unwrap();
        assert_eq!(loaded.name, "demo");
        assert!(loaded.is_member(&email("a@x.com")));
    }

    #[tokio::test]
    async fn test_get_missing_fails() {
        // given:
        let repo = InMemoryProjectRepository::new();
        let id = ProjectIdFactory::generate();

        // when:
        let result = repo.get(&id).await;

        // then:
        assert_eq!(
            result.unwrap_err(),
            RepositoryError::ProjectNotFound(id.as_str().to_string())
        );
    }

    #[tokio::test]
    async fn test_all_for_member_filters_by_membership() {
        // given:
        let repo = InMemoryProjectRepository::new();
        repo.create(project("mine", "a@x.com")).await.unwrap();
        repo.create(project("also-mine", "a@x.com")).await.unwrap();
        repo.create(project("theirs", "b@x.com")).await.unwrap();

        // when:
        let mine = repo.all_for_member(&email("a@x.com")).await;

        // then:
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.is_member(&email("a@x.com"))));
    }

    #[tokio::test]
    async fn test_add_users_returns_updated_project() {
        // given:
        let repo = InMemoryProjectRepository::new();
        let p = project("demo", "a@x.com");
        let id = p.id.clone();
        repo.create(p).await.unwrap();

        // when:
        let updated = repo
            .add_users(&id, vec![email("b@x.com"), email("b@x.com")])
            .await
            .unwrap();

        // then: set semantics
        assert_eq!(updated.users.len(), 2);
    }

    #[tokio::test]
    async fn test_update_file_tree_overwrites_whole_document() {
        // given: a project whose tree already has two files
        let repo = InMemoryProjectRepository::new();
        let mut p = project("demo", "a@x.com");
        let id = p.id.clone();
        p.file_tree.write("a.js", "a".to_string()).unwrap();
        p.file_tree.write("b.js", "b".to_string()).unwrap();
        repo.create(p).await.unwrap();

        // when: a save that only knows about a.js lands last
        let mut partial = FileTree::empty();
        partial.write("a.js", "a2".to_string()).unwrap();
        repo.update_file_tree(&id, partial).await.unwrap();

        // then: the whole document was replaced; b.js is gone
        let loaded = repo.get(&id).await.unwrap();
        assert_eq!(loaded.file_tree.read("a.js").unwrap(), "a2");
        assert!(loaded.file_tree.read("b.js").is_err());
    }
}
