// SPDX-License-Identifier: MIT
// Schema-aware YAML completion core.
//
// Pure functions of (document text, cursor position, schema): the Context
// Resolver walks upward for the nearest root-level key, and the Completion
// Generator turns the word under the cursor plus that context into a ranked,
// prunable candidate list with a replacement span.  There is no YAML parsing —
// dispatch is fixed pattern-matching on the text immediately before the cursor.

pub mod context;
pub mod engine;
pub mod model;
pub mod schema;
