//! Classification of OSM tag values into closed enums.
//!
//! Every `from_tag` is total: values that are not recognised map to an
//! `Unknown` variant instead of failing, so a stray tag never aborts an
//! ingestion run.  Ingestion decides separately which variants it keeps.

use std::fmt;

/// Generate `as_str`, `Display`, and a table-driven `from_tag` for a
/// fieldless enum with an `Unknown` fallback.
macro_rules! tag_enum {
    (
        $(#[$attr:meta])*
        pub enum $name:ident { $($variant:ident => $tag:literal),+ $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $($variant,)+
            #[default]
            Unknown,
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+ $name::Unknown];

            /// OSM tag value for this variant; `"unknown"` for the fallback.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                    $name::Unknown => "unknown",
                }
            }

            pub fn from_tag(value: &str) -> $name {
                match value {
                    $($tag => $name::$variant,)+
                    _ => $name::Unknown,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum! {
    /// Road class from the `highway=*` tag, with `_link` suffixes folded
    /// into their parent class.
    pub enum HighwayType {
        Motorway     => "motorway",
        Trunk        => "trunk",
        Primary      => "primary",
        Secondary    => "secondary",
        Tertiary     => "tertiary",
        Unclassified => "unclassified",
        Residential  => "residential",
        LivingStreet => "living_street",
        Service      => "service",
        Track        => "track",
        Road         => "road",
    }
}

impl HighwayType {
    /// Parse a raw `highway` value, returning the class and whether it was a
    /// `*_link` ramp.
    pub fn classify(value: &str) -> (HighwayType, bool) {
        match value.strip_suffix("_link") {
            Some(base) => {
                let class = HighwayType::from_tag(base);
                // Only the five trunk-road classes have link variants.
                (class, class.is_target())
            }
            None => (HighwayType::from_tag(value), false),
        }
    }

    /// `true` for the "important" classes summed into the map's target
    /// aggregates.
    pub fn is_target(self) -> bool {
        matches!(
            self,
            HighwayType::Motorway
                | HighwayType::Trunk
                | HighwayType::Primary
                | HighwayType::Secondary
                | HighwayType::Tertiary
        )
    }

    /// `true` for anything ingestion keeps as a road.
    pub fn is_road(self) -> bool {
        self != HighwayType::Unknown
    }

    /// Motorways are one-way by OSM convention even without a tag.
    pub fn implies_one_way(self) -> bool {
        self == HighwayType::Motorway
    }
}

tag_enum! {
    /// Node classification from the `place=*` tag.  Plain road vertices
    /// are `Waypoint`.
    pub enum NodeKind {
        Waypoint => "waypoint",
        City     => "city",
        Town     => "town",
        Village  => "village",
        Hamlet   => "hamlet",
        Suburb   => "suburb",
        Locality => "locality",
    }
}

impl NodeKind {
    /// Populated places that ingestion keeps even when no road uses them.
    pub fn is_populated_place(self) -> bool {
        matches!(
            self,
            NodeKind::City | NodeKind::Town | NodeKind::Village | NodeKind::Hamlet | NodeKind::Suburb
        )
    }
}

tag_enum! {
    /// Road surface from the `surface=*` tag.
    pub enum Surface {
        Asphalt      => "asphalt",
        Concrete     => "concrete",
        PavingStones => "paving_stones",
        Sett         => "sett",
        Paved        => "paved",
        Compacted    => "compacted",
        FineGravel   => "fine_gravel",
        Gravel       => "gravel",
        Unpaved      => "unpaved",
        Dirt         => "dirt",
        Ground       => "ground",
        Sand         => "sand",
        Grass        => "grass",
    }
}

tag_enum! {
    /// Road smoothness from the `smoothness=*` tag.
    pub enum Smoothness {
        Excellent    => "excellent",
        Good         => "good",
        Intermediate => "intermediate",
        Bad          => "bad",
        VeryBad      => "very_bad",
        Horrible     => "horrible",
        VeryHorrible => "very_horrible",
        Impassable   => "impassable",
    }
}
