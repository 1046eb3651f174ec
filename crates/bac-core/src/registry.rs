// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-element controller instances and by-name method dispatch.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::callbacks::AutocompleteCallbacks;
use crate::controller::AutocompleteController;
use crate::error::{AutocompleteError, Result};
use crate::input::TextInput;
use crate::options::AutocompleteOptions;
use crate::suggestion::Resource;
use crate::surface::PresentationSurface;

/// Host-assigned identity of an input element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Init,
    Enable,
    Disable,
    Destroy,
}

impl FromStr for Method {
    type Err = AutocompleteError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "init" => Ok(Method::Init),
            "enable" => Ok(Method::Enable),
            "disable" => Ok(Method::Disable),
            "destroy" => Ok(Method::Destroy),
            other => Err(AutocompleteError::UnknownMethod(other.to_owned())),
        }
    }
}

pub struct AutocompleteRegistry<S: PresentationSurface> {
    instances: BTreeMap<ElementId, AutocompleteController<S>>,
}

impl<S: PresentationSurface> Default for AutocompleteRegistry<S> {
    fn default() -> Self {
        Self {
            instances: BTreeMap::new(),
        }
    }
}

impl<S: PresentationSurface> AutocompleteRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an enabled controller to `element`. An instance already on the
    /// element is destroyed first.
    pub fn init(
        &mut self,
        element: ElementId,
        input: TextInput,
        resource: Resource,
        options: &AutocompleteOptions,
        callbacks: Box<dyn AutocompleteCallbacks>,
        surface: S,
    ) -> &mut AutocompleteController<S> {
        if let Some(previous) = self.instances.remove(&element) {
            warn!(%element, "replacing existing autocomplete instance");
            previous.destroy();
        }
        let mut controller = AutocompleteController::new(input, resource, options, callbacks, surface);
        controller.enable();
        debug!(%element, "autocomplete initialised");
        self.instances.entry(element).or_insert(controller)
    }

    /// Call a lifecycle method by name. Returns whether an instance was
    /// affected; methods on elements without an instance do nothing.
    pub fn invoke(&mut self, element: ElementId, method: &str) -> Result<bool> {
        match method.parse::<Method>()? {
            Method::Init => Err(AutocompleteError::InitNeedsArguments),
            Method::Enable => Ok(self.enable(element)),
            Method::Disable => Ok(self.disable(element)),
            Method::Destroy => Ok(self.destroy(element).is_some()),
        }
    }

    pub fn enable(&mut self, element: ElementId) -> bool {
        self.get_mut(element).map(AutocompleteController::enable).is_some()
    }

    pub fn disable(&mut self, element: ElementId) -> bool {
        self.get_mut(element).map(AutocompleteController::disable).is_some()
    }

    /// Remove and destroy the instance, handing back its input and surface.
    pub fn destroy(&mut self, element: ElementId) -> Option<(TextInput, S)> {
        self.instances.remove(&element).map(AutocompleteController::destroy)
    }

    pub fn get(&self, element: ElementId) -> Option<&AutocompleteController<S>> {
        self.instances.get(&element)
    }

    pub fn get_mut(&mut self, element: ElementId) -> Option<&mut AutocompleteController<S>> {
        self.instances.get_mut(&element)
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.instances.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
