//! Registry of built-in and user-defined personas.

use thiserror::Error;

use super::library::{builtin_ids, builtin_personas};
use super::Persona;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Invalid persona: {0}")]
    Invalid(String),
    #[error("Persona '{0}' is built in and cannot be replaced")]
    BuiltinConflict(String),
}

/// Personas in display order plus the subset enabled for fan-out.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
    enabled: Vec<String>,
}

impl Default for PersonaCatalog {
    /// Built-ins only, all enabled.
    fn default() -> Self {
        Self {
            personas: builtin_personas().to_vec(),
            enabled: builtin_ids(),
        }
    }
}

impl PersonaCatalog {
    /// Built-ins followed by `custom`, with `enabled` selecting the fan-out set.
    ///
    /// Invalid custom personas are skipped with a warning.
    pub fn new(custom: Vec<Persona>, enabled: Vec<String>) -> Self {
        let mut catalog = Self {
            personas: builtin_personas().to_vec(),
            enabled,
        };
        for persona in custom {
            let id = persona.id.clone();
            if let Err(e) = catalog.insert(persona) {
                tracing::warn!(persona = %id, error = %e, "Skipping custom persona");
            }
        }
        catalog
    }

    fn insert(&mut self, persona: Persona) -> Result<(), CatalogError> {
        persona.validate().map_err(CatalogError::Invalid)?;
        if builtin_personas().iter().any(|p| p.id == persona.id) {
            return Err(CatalogError::BuiltinConflict(persona.id));
        }
        match self.personas.iter_mut().find(|p| p.id == persona.id) {
            Some(existing) => *existing = persona,
            None => self.personas.push(persona),
        }
        Ok(())
    }

    /// Enabled personas in catalog order.
    pub fn list_personas(&self) -> Vec<&Persona> {
        self.personas
            .iter()
            .filter(|p| self.enabled.iter().any(|id| id == &p.id))
            .collect()
    }

    pub fn list_all_personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn get_persona(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.iter().any(|e| e == id)
    }

    /// Add or replace a custom persona and enable it.
    pub fn register_custom_persona(&mut self, persona: Persona) -> Result<(), CatalogError> {
        let id = persona.id.clone();
        self.insert(persona)?;
        if !self.is_enabled(&id) {
            self.enabled.push(id);
        }
        Ok(())
    }

    /// Replace the enabled set. Unknown ids are kept; they simply match nothing.
    pub fn set_enabled_personas(&mut self, ids: Vec<String>) {
        self.enabled = ids;
    }
}
