#![warn(missing_docs)]
//! Anchor-based layout for the in-game UI.
//!
//! Every item declares how its edges and centers relate to its parent or to
//! sibling items. Binding a tree orders each scope's siblings by dependency,
//! derives concrete geometry top-down and applies margins. A lazy post-order
//! traversal then drives hit-testing and event dispatch front to back.
//!
//! ```
//! use surviveler_ui::{AnchorRef, AnchorSpec, AnchorType, Item, ItemTree, Margin};
//!
//! let mut tree = ItemTree::new(500.0, 500.0);
//! let root = tree.root();
//! let header = AnchorSpec::new()
//!     .left(AnchorRef::parent(AnchorType::Left))
//!     .right(AnchorRef::parent(AnchorType::Right))
//!     .top(AnchorRef::parent(AnchorType::Top))
//!     .with_height(40.0);
//! let header = tree.add_child(root, "header", Item::new(header, Margin::default())?)?;
//! tree.bind()?;
//! assert_eq!(tree.width(header), Some(500.0));
//! # Ok::<(), surviveler_ui::LayoutError>(())
//! ```

pub mod anchor;
pub mod derive;
pub mod document;
pub mod error;
pub mod event;
pub mod item;
pub mod margin;
pub mod resolver;
pub mod snapshot;
pub mod traverse;
pub mod tree;

pub use anchor::{Anchor, AnchorRef, AnchorSpec, AnchorTarget, AnchorType, Axis, PARENT_TARGET};
pub use derive::{derive_anchor, ResolvedRefs};
pub use document::{AnchorDecl, DocumentError, ItemDecl, LayoutDocument, MarginDecl, Viewport};
pub use error::{LayoutError, Result, ValidationCause};
pub use event::{Handler, UiEvent};
pub use item::{Behavior, Item, ItemBuilder};
pub use margin::{Margin, MarginType};
pub use resolver::{evaluation_order, ScopeEntry};
pub use snapshot::{ItemSnapshot, LayoutSnapshot};
pub use traverse::{TraversalFilter, Traverse};
pub use tree::{ItemId, ItemTree, ROOT_KEY};
