//! Customer editor workflow.
//!
//! # Responsibility
//! - Hold one draft customer at a time (new or existing).
//! - Persist or delete the draft and report what changed.
//!
//! # Invariants
//! - Existing customers are reloaded from the store before editing.
//! - `cancel` never touches the store.
//! - Every terminal operation (`save`, `delete`, `cancel`) closes the editor.
//!
//! Callers refresh their listing after each `EditorChange`.

use crate::model::customer::{Customer, CustomerId};
use crate::repo::customer_repo::{CustomerRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum EditorError {
    /// No customer is open in the editor.
    NotEditing,
    /// Delete requested for a customer that was never saved.
    NotPersisted,
    Repo(RepoError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "no customer is being edited"),
            Self::NotPersisted => write!(f, "customer has not been saved yet"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of a terminal editor operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorChange {
    Saved(Customer),
    Deleted(CustomerId),
    Cancelled,
}

#[derive(Debug, Clone)]
struct Draft {
    customer: Customer,
    persisted: bool,
}

pub struct CustomerEditor<R: CustomerRepository> {
    repo: R,
    draft: Option<Draft>,
}

impl<R: CustomerRepository> CustomerEditor<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, draft: None }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Current draft, if the editor is open.
    pub fn current(&self) -> Option<&Customer> {
        self.draft.as_ref().map(|draft| &draft.customer)
    }

    /// Whether the open draft already exists in the store.
    pub fn is_persisted(&self) -> bool {
        self.draft.as_ref().is_some_and(|draft| draft.persisted)
    }

    /// Opens a blank customer; replaces any unsaved draft.
    pub fn edit_new(&mut self) -> &Customer {
        let draft = self.draft.insert(Draft {
            customer: Customer::new("", ""),
            persisted: false,
        });
        &draft.customer
    }

    /// Opens a fresh copy of a stored customer.
    pub fn edit_existing(&mut self, id: CustomerId) -> Result<&Customer, EditorError> {
        let customer = self.repo.find_by_id(id)?.ok_or(RepoError::NotFound(id))?;
        let draft = self.draft.insert(Draft {
            customer,
            persisted: true,
        });
        Ok(&draft.customer)
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) -> Result<(), EditorError> {
        self.draft_mut()?.customer.first_name = value.into();
        Ok(())
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) -> Result<(), EditorError> {
        self.draft_mut()?.customer.last_name = value.into();
        Ok(())
    }

    /// Persists the draft and closes the editor.
    ///
    /// On failure the draft stays open so the user can correct it.
    pub fn save(&mut self) -> Result<EditorChange, EditorError> {
        let draft = self.draft.as_ref().ok_or(EditorError::NotEditing)?;
        let saved = self.repo.save(&draft.customer)?;
        self.draft = None;
        info!("event=editor_save module=editor status=ok id={}", saved.id);
        Ok(EditorChange::Saved(saved))
    }

    /// Deletes the open customer and closes the editor.
    pub fn delete(&mut self) -> Result<EditorChange, EditorError> {
        let draft = self.draft.as_ref().ok_or(EditorError::NotEditing)?;
        if !draft.persisted {
            return Err(EditorError::NotPersisted);
        }
        let id = draft.customer.id;
        self.repo.delete_by_id(id)?;
        self.draft = None;
        info!("event=editor_delete module=editor status=ok id={id}");
        Ok(EditorChange::Deleted(id))
    }

    /// Discards the draft without touching the store.
    pub fn cancel(&mut self) -> Result<EditorChange, EditorError> {
        self.draft.take().ok_or(EditorError::NotEditing)?;
        Ok(EditorChange::Cancelled)
    }

    fn draft_mut(&mut self) -> Result<&mut Draft, EditorError> {
        self.draft.as_mut().ok_or(EditorError::NotEditing)
    }
}
