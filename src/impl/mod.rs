// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod backend_datasource;
        pub(crate) mod memory_datasource;
        pub(crate) mod seed_csv_datasource;
        pub(crate) mod supabase_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod amount_model;
        pub(crate) mod client_model;
        pub(crate) mod iso_date_model;
        pub(crate) mod product_model;
        pub(crate) mod settings_model;
        pub(crate) mod transaction_model;
        pub(crate) mod user_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod auth_repository_impl;
        pub(crate) mod finance_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod client;
        pub(crate) mod finance_state;
        pub(crate) mod intake;
        pub(crate) mod product;
        pub(crate) mod reports;
        pub(crate) mod similarity;
        pub(crate) mod speech;
        pub(crate) mod totals;
        pub(crate) mod transaction;
        pub(crate) mod user;
        pub(crate) mod voice_command;
    }
    pub(crate) mod logic {
        pub(crate) mod calendar;
        pub(crate) mod deadline;
        pub(crate) mod ledger;
        pub(crate) mod number_words;
        pub(crate) mod report_aggregator;
        pub(crate) mod route_guard;
        pub(crate) mod voice_parser;
        pub(crate) mod voice_session;
    }
    pub(crate) mod repositories {
        pub(crate) mod auth_repository;
        pub(crate) mod finance_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod auth_usecase;
        pub(crate) mod catalog_usecase;
        pub(crate) mod intake_usecase;
        pub(crate) mod report_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod route_sheet_printer;
    pub(crate) mod spreadsheet_writer;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::client::*;
        pub use crate::domain::entities::finance_state::*;
        pub use crate::domain::entities::intake::*;
        pub use crate::domain::entities::product::*;
        pub use crate::domain::entities::reports::*;
        pub use crate::domain::entities::similarity::*;
        pub use crate::domain::entities::speech::*;
        pub use crate::domain::entities::totals::*;
        pub use crate::domain::entities::transaction::*;
        pub use crate::domain::entities::user::*;
        pub use crate::domain::entities::voice_command::*;
    }

    pub mod datasources {
        pub use crate::data::datasources::memory_datasource::InMemoryDatasource;
        pub use crate::data::datasources::supabase_datasource::SupabaseDatasource;
    }

    pub mod logic {
        pub use crate::domain::logic::calendar::{peru_now, peru_today};
        pub use crate::domain::logic::ledger::{balance, day_totals, shift_totals};
        pub use crate::domain::logic::number_words::normalize_number_words;
        pub use crate::domain::logic::report_aggregator::{
            debt_rollup, product_ranking, route_sheet,
        };
        pub use crate::domain::logic::route_guard::route_decision;
        pub use crate::domain::logic::voice_parser::VoiceCommandParser;
        pub use crate::domain::logic::voice_session::VoiceSession;
    }

    pub mod formatting {
        pub use crate::presentation::route_sheet_printer::RouteSheetPrinter;
        pub use crate::presentation::spreadsheet_writer::SpreadsheetWriter;
        pub use crate::presentation::utils::{format_amount, format_display_date};
    }
}
