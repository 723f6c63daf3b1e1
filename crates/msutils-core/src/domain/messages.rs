//! Message catalog
//!
//! Every user-facing text lives here so responses stay consistent across
//! services. Each category is a flat enum: the variant is the symbolic name,
//! `message()` is the human-readable text.

use std::fmt;
use std::str::FromStr;

/// Anything that resolves to a fixed catalog text
pub trait MessageText {
    fn text(&self) -> &'static str;
}

impl MessageText for &'static str {
    fn text(&self) -> &'static str {
        self
    }
}

/// Returned when a symbolic name is not part of a category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {category} message '{name}'")]
pub struct UnknownMessage {
    pub category: &'static str,
    pub name: String,
}

macro_rules! message_catalog {
    (
        $(#[$meta:meta])*
        $enum_name:ident ($category:literal) {
            $($variant:ident($symbol:literal) => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $($variant,)+
        }

        impl $enum_name {
            /// Every message of the category, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Human-readable text
            pub fn message(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Symbolic name, e.g. `NOT_FOUND`
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $symbol,)+
                }
            }
        }

        impl MessageText for $enum_name {
            fn text(&self) -> &'static str {
                self.message()
            }
        }

        impl fmt::Display for $enum_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.message())
            }
        }

        impl FromStr for $enum_name {
            type Err = UnknownMessage;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|m| m.name() == s)
                    .ok_or_else(|| UnknownMessage {
                        category: $category,
                        name: s.to_string(),
                    })
            }
        }
    };
}

message_catalog! {
    /// General application messages
    GeneralMessage("general") {
        Success("SUCCESS") => "Operación completada con éxito",
        Error("ERROR") => "Se produjo un error",
        InternalServerError("INTERNAL_SERVER_ERROR") => "Error interno del servidor",
        NotFound("NOT_FOUND") => "Recurso no encontrado",
        Forbidden("FORBIDDEN") => "Acceso denegado",
        Unauthorized("UNAUTHORIZED") => "Acceso no autorizado",
        BadRequest("BAD_REQUEST") => "Solicitud incorrecta",
        Conflict("CONFLICT") => "Conflicto con el recurso existente",
        InvalidInput("INVALID_INPUT") => "Datos de entrada inválidos",
        MissingRequiredFields("MISSING_REQUIRED_FIELDS") => "Faltan campos requeridos",
        InvalidCredentials("INVALID_CREDENTIALS") => "Credenciales inválidas",
        SessionExpired("SESSION_EXPIRED") => "Sesión expirada",
        OperationNotAllowed("OPERATION_NOT_ALLOWED") => "Operación no permitida",
    }
}

message_catalog! {
    /// User management messages
    UserMessage("user") {
        UserCreated("USER_CREATED") => "Usuario creado exitosamente",
        UserUpdated("USER_UPDATED") => "Usuario actualizado exitosamente",
        UserDeleted("USER_DELETED") => "Usuario eliminado exitosamente",
        UserNotFound("USER_NOT_FOUND") => "Usuario no encontrado",
        UserAlreadyExists("USER_ALREADY_EXISTS") => "El usuario ya existe",
        UserInactive("USER_INACTIVE") => "El usuario está inactivo",
        InvalidPassword("INVALID_PASSWORD") => "Contraseña inválida",
        PasswordUpdated("PASSWORD_UPDATED") => "Contraseña actualizada correctamente",
        EmailAlreadyExists("EMAIL_ALREADY_EXISTS") => "El correo electrónico ya está registrado",
        InvalidEmailFormat("INVALID_EMAIL_FORMAT") => "Formato de correo electrónico inválido",
        RoleAssigned("ROLE_ASSIGNED") => "Rol asignado correctamente",
        RoleNotFound("ROLE_NOT_FOUND") => "Rol no encontrado",
        PermissionDenied("PERMISSION_DENIED") => "Permiso denegado",
    }
}

message_catalog! {
    /// Authentication messages
    AuthMessage("auth") {
        LoginSuccess("LOGIN_SUCCESS") => "Inicio de sesión exitoso",
        LoginFailed("LOGIN_FAILED") => "Inicio de sesión fallido",
        LogoutSuccess("LOGOUT_SUCCESS") => "Cierre de sesión exitoso",
        TokenExpired("TOKEN_EXPIRED") => "Token expirado",
        TokenInvalid("TOKEN_INVALID") => "Token inválido",
        TokenRevoked("TOKEN_REVOKED") => "Token revocado",
        TokenRefreshSuccess("TOKEN_REFRESH_SUCCESS") => "Token actualizado correctamente",
    }
}

message_catalog! {
    /// Report messages
    ReportMessage("report") {
        ReportCreated("REPORT_CREATED") => "Reporte creado exitosamente",
        ReportUpdated("REPORT_UPDATED") => "Reporte actualizado exitosamente",
        ReportDeleted("REPORT_DELETED") => "Reporte eliminado exitosamente",
        ReportNotFound("REPORT_NOT_FOUND") => "Reporte no encontrado",
        ReportAlreadyExists("REPORT_ALREADY_EXISTS") => "El reporte ya existe",
        ReportPartUpdated("REPORT_PART_UPDATED") => "Parte del reporte actualizada correctamente",
        ReportFinished("REPORT_FINISHED") => "Reporte finalizado correctamente",
        InvalidReportNumber("INVALID_REPORT_NUMBER") => "Número de reporte inválido",
        ReportNotEditable("REPORT_NOT_EDITABLE") => "El reporte no puede ser editado",
    }
}

message_catalog! {
    /// Client messages
    ClientMessage("client") {
        ClientCreated("CLIENT_CREATED") => "Cliente creado exitosamente",
        ClientUpdated("CLIENT_UPDATED") => "Cliente actualizado exitosamente",
        ClientDeleted("CLIENT_DELETED") => "Cliente eliminado exitosamente",
        ClientNotFound("CLIENT_NOT_FOUND") => "Cliente no encontrado",
        ClientAlreadyExists("CLIENT_ALREADY_EXISTS") => "El cliente ya existe",
    }
}

message_catalog! {
    /// Role messages
    RoleMessage("role") {
        RoleRetrieved("ROLE_RETRIEVED") => "Rol recuperado exitosamente",
        RoleCreated("ROLE_CREATED") => "Rol creado exitosamente",
        RoleUpdated("ROLE_UPDATED") => "Rol actualizado exitosamente",
        RoleDeleted("ROLE_DELETED") => "Rol eliminado exitosamente",
        RoleNotFound("ROLE_NOT_FOUND") => "Rol no encontrado",
        RoleAlreadyExists("ROLE_ALREADY_EXISTS") => "El rol ya existe",
        PermissionAddedToRole("PERMISSION_ADDED_TO_ROLE") => "Permiso agregado al rol correctamente",
        PermissionRemovedFromRole("PERMISSION_REMOVED_FROM_ROLE") => "Permiso eliminado del rol correctamente",
        InvalidRoleName("INVALID_ROLE_NAME") => "Nombre de rol inválido",
    }
}

message_catalog! {
    /// Permission messages
    PermissionMessage("permission") {
        PermissionCreated("PERMISSION_CREATED") => "Permiso creado exitosamente",
        PermissionUpdated("PERMISSION_UPDATED") => "Permiso actualizado exitosamente",
        PermissionDeleted("PERMISSION_DELETED") => "Permiso eliminado exitosamente",
        PermissionNotFound("PERMISSION_NOT_FOUND") => "Permiso no encontrado",
        PermissionAlreadyExists("PERMISSION_ALREADY_EXISTS") => "El permiso ya existe",
        InvalidPermissionName("INVALID_PERMISSION_NAME") => "Nombre de permiso inválido",
        PermissionAssignedToRole("PERMISSION_ASSIGNED_TO_ROLE") => "Permiso asignado al rol correctamente",
        PermissionRemovedFromRole("PERMISSION_REMOVED_FROM_ROLE") => "Permiso eliminado del rol correctamente",
    }
}

/// Entry point for catalog helpers that span categories
pub struct Messages;

impl Messages {
    /// Map an HTTP status code to its general message.
    ///
    /// Codes outside the table fall back to a non-empty `default`, then to
    /// [`GeneralMessage::Error`].
    pub fn get_by_code<'a>(code: u16, default: Option<&'a str>) -> &'a str {
        match code {
            400 => GeneralMessage::BadRequest.message(),
            401 => GeneralMessage::Unauthorized.message(),
            403 => GeneralMessage::Forbidden.message(),
            404 => GeneralMessage::NotFound.message(),
            409 => GeneralMessage::Conflict.message(),
            500 => GeneralMessage::InternalServerError.message(),
            _ => default
                .filter(|d| !d.is_empty())
                .unwrap_or(GeneralMessage::Error.message()),
        }
    }

    /// Fill `{key}` placeholders in a catalog text.
    ///
    /// Placeholders without a matching parameter are kept as-is.
    pub fn format(message: impl MessageText, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(message.text().to_string(), |text, (key, value)| {
                text.replace(&format!("{{{}}}", key), value)
            })
    }
}
