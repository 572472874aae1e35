use crate::control::ControlView;
use crate::geometry::{Rect, Viewport};
use draftai_api::Tone;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Failed to create element: {0}")]
    Create(String),

    #[error("Failed to insert element: {0}")]
    Insert(String),

    #[error("Failed to edit element: {0}")]
    Edit(String),
}

/// Elements that make up one mounted control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlElements<E> {
    pub container: E,
    pub primary: E,
    pub dropdown: E,
    pub menu: E,
    pub items: Vec<(Tone, E)>,
}

/// The part of the webmail page the extension reads and writes.
///
/// Implemented over `web_sys` in the browser and by
/// `MemoryDocument` everywhere else.
pub trait HostDocument {
    type Element: Clone + PartialEq + fmt::Debug;

    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    fn query_selector_within(&self, root: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn is_connected(&self, element: &Self::Element) -> bool;

    fn inner_text(&self, element: &Self::Element) -> String;

    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    fn viewport(&self) -> Viewport;

    /// Builds the control markup, inserts the container as the first child of
    /// `toolbar` and appends the floating menu to the body.
    fn mount_control(
        &mut self,
        toolbar: &Self::Element,
        view: &ControlView,
    ) -> Result<ControlElements<Self::Element>, DomError>;

    fn render_control(
        &mut self,
        elements: &ControlElements<Self::Element>,
        view: &ControlView,
    ) -> Result<(), DomError>;

    fn remove_control(&mut self, elements: &ControlElements<Self::Element>);

    fn focus(&mut self, element: &Self::Element);

    /// Inserts at the caret of the focused element, leaving existing content in place.
    fn insert_text(&mut self, element: &Self::Element, text: &str) -> Result<(), DomError>;
}
