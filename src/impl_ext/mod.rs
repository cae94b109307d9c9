// Crate-internal.
// ---

pub(crate) mod standard_scorers {
    pub(crate) mod exact_token;
    pub(crate) mod token_edit_distance;
}

// Public exports.
// ---

pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod standard_scorers {
        pub use crate::impl_ext::standard_scorers::exact_token::*;
        pub use crate::impl_ext::standard_scorers::token_edit_distance::*;
    }
}
