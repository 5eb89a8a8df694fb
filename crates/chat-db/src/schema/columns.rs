use std::fmt;

/// Columns added after the original schema shipped
///
/// Deployments created before these existed are healed in place the first
/// time a write needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalColumn {
    MessageColor,
    MessageType,
    AudioFilePath,
    AudioDuration,
    UserMessageColor,
}

impl OptionalColumn {
    pub const ALL: [Self; 5] = [
        Self::MessageColor,
        Self::MessageType,
        Self::AudioFilePath,
        Self::AudioDuration,
        Self::UserMessageColor,
    ];

    pub const fn table(self) -> &'static str {
        match self {
            Self::UserMessageColor => "users",
            _ => "messages",
        }
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::MessageColor | Self::UserMessageColor => "message_color",
            Self::MessageType => "message_type",
            Self::AudioFilePath => "audio_file_path",
            Self::AudioDuration => "audio_duration",
        }
    }

    /// Column type and default as used in `ADD COLUMN`
    pub const fn definition(self) -> &'static str {
        match self {
            Self::MessageColor => "VARCHAR(7) DEFAULT '#6b7280'",
            Self::MessageType => "VARCHAR(10) DEFAULT 'text'",
            Self::AudioFilePath => "TEXT",
            Self::AudioDuration => "INTEGER",
            Self::UserMessageColor => "VARCHAR(7)",
        }
    }

    /// SQL type used for the `NULL` placeholder when the column is absent
    pub const fn placeholder_type(self) -> &'static str {
        match self {
            Self::AudioDuration => "INTEGER",
            _ => "TEXT",
        }
    }

    pub fn add_column_sql(self) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table(),
            self.column(),
            self.definition()
        )
    }

    /// Select-list item: the column itself, or a typed `NULL` under the same name
    pub fn select_expr(self, qualifier: &str, present: bool) -> String {
        if present {
            format!("{qualifier}.{}", self.column())
        } else {
            format!("NULL::{} AS {}", self.placeholder_type(), self.column())
        }
    }
}

impl fmt::Display for OptionalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table(), self.column())
    }
}
