use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");
define_client_error!(WriteError, "Error writing file: {path}.", { path: &str });

// Configuration-related.
define_internal_error!(
    MissingBackendCredentials,
    "Missing backend credentials: environment variable '{variable}' is not set.",
    { variable: &str }
);

// Parsing-related.
define_client_error!(InvalidCsv, "Invalid CSV format.");
define_client_error!(InvalidCsvContent, "Invalid CSV content: {details}.", { details: &str });
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(InvalidIsoDate, "Fecha inválida: {date}.", { date: &str });
define_client_error!(InvalidAmount, "Monto inválido: '{value}'.", { value: &str });

// Authentication-related.
define_client_error!(NotAuthenticated, "Usuario no autenticado.");
define_client_error!(
    AuthenticationFailed,
    "No se pudo iniciar sesión: {details}.",
    { details: &str }
);
define_client_error!(AdminRequired, "Se requiere una cuenta de administrador.");

// Validation-related.
define_client_error!(ClientNotSelected, "Selecciona un cliente.");
define_client_error!(EmptySubmission, "Ingresa un monto o selecciona productos.");
define_client_error!(
    ManualAmountLocked,
    "El monto entregado se calcula a partir de los productos seleccionados."
);
define_client_error!(ClientAlreadyExists, "El cliente ya existe: {name}.", { name: &str });
define_client_error!(
    DeliveryItemsMismatch,
    "El monto entregado ({amount}) no coincide con la suma de sus productos ({items_total}).",
    { amount: f64, items_total: f64 }
);
define_client_error!(
    NegativeAmount,
    "El monto no puede ser negativo ({amount}).",
    { amount: f64 }
);

// Backend-related.
define_internal_error!(
    BackendRequestFailed,
    "Backend request failed during '{operation}'.",
    { operation: &str }
);
define_client_error!(
    BackendRejected,
    "Backend rejected '{operation}' (HTTP {status}).",
    { operation: &str, status: u16 }
);
define_internal_error!(
    InvalidBackendResponse,
    "Invalid backend response for '{operation}'.",
    { operation: &str }
);
define_client_error!(
    RecordNotFound,
    "{entity} '{id}' no encontrado.",
    { entity: &str, id: &str }
);

// Loading-related.
define_client_error!(
    LoadTimedOut,
    "Tiempo de espera agotado: {operation}.",
    { operation: &str }
);
