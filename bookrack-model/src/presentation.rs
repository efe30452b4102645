//! Presentation state carried in the query-options token. None of these
//! influence SQL composition.

macro_rules! coded_enum {
    ($name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
        #[repr(u8)]
        pub enum $name {
            #[default]
            $($variant = $code),+
        }

        impl $name {
            pub fn code(self) -> u8 {
                self as u8
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Parses the request spelling, e.g. `en` or `grid`.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

coded_enum!(GuiLang {
    German = 0 => "de",
    English = 1 => "en",
});

coded_enum!(Layout {
    List = 0 => "list",
    Grid = 1 => "grid",
});

coded_enum!(Theme {
    Light = 0 => "light",
    Dark = 1 => "dark",
});
