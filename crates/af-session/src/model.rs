//! Identity and scope values carried by sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The resolved identity associated with a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user identifier.
    pub user_id: String,
    /// Human-readable name, if the provider supplied one.
    pub display_name: Option<String>,
}

impl Principal {
    /// Creates a principal for the given user.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the display name, falling back to the user id.
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }
}

/// Reference to a single workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project identifier.
    pub id: String,
    /// Project name.
    pub name: String,
}

impl ProjectRef {
    /// Creates a project reference.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Scope within which a session's permissions apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthSpace {
    /// The whole application.
    Application {
        /// Space identifier.
        id: String,
    },
    /// One project.
    Project(ProjectRef),
}

impl AuthSpace {
    /// Creates an application-wide space.
    #[must_use]
    pub fn application(id: impl Into<String>) -> Self {
        Self::Application { id: id.into() }
    }

    /// Returns the space identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Application { id } => id,
            Self::Project(project) => &project.id,
        }
    }

    /// Returns the project, if this space is one.
    #[must_use]
    pub const fn project(&self) -> Option<&ProjectRef> {
        match self {
            Self::Application { .. } => None,
            Self::Project(project) => Some(project),
        }
    }
}

impl From<ProjectRef> for AuthSpace {
    fn from(project: ProjectRef) -> Self {
        Self::Project(project)
    }
}

impl fmt::Display for AuthSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application { id } => write!(f, "application:{id}"),
            Self::Project(project) => write!(f, "project:{}", project.id),
        }
    }
}
