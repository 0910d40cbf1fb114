//! Static actor definitions and the shared name tables they index into.
//!
//! Each character record stores small indices into lookup tables of part
//! and colour names. Many actors share a table, so the definitions hold a
//! [`TableId`] handle into one static arena instead of their own copy.

/// Handle into the name-table arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableId(u8);

/// Named immutable list of part or colour names.
#[derive(Debug)]
pub struct NameTable {
    pub name: &'static str,
    pub entries: &'static [&'static str],
}

static TABLES: [NameTable; 5] = [
    NameTable {
        name: "hat parts",
        entries: &[
            "baseball", "chef", "cap", "cophat", "helmet", "ponytail", "pageboy", "shrthair",
            "bald", "flower", "cboyhat", "cuphat", "cathat", "backbcap", "pizhat", "caprc",
            "capch", "capdb", "capjs", "capmd", "capmm", "capmp", "capmn", "capml",
        ],
    },
    NameTable {
        name: "pepper hats",
        entries: &["baseball", "backbcap", "capjs", "helmet"],
    },
    NameTable {
        name: "ghost hats",
        entries: &["bald"],
    },
    NameTable {
        name: "colors",
        entries: &[
            "lego white",
            "lego black",
            "lego yellow",
            "lego red",
            "lego blue",
            "lego brown",
            "lego lt grey",
            "lego green",
        ],
    },
    NameTable {
        name: "ghost colors",
        entries: &["lego white", "lego lt grey"],
    },
];

impl TableId {
    pub const HAT_PARTS: Self = Self(0);
    pub const PEPPER_HATS: Self = Self(1);
    pub const GHOST_HATS: Self = Self(2);
    pub const COLORS: Self = Self(3);
    pub const GHOST_COLORS: Self = Self(4);

    pub fn table(self) -> &'static NameTable {
        &TABLES[self.0 as usize]
    }

    /// Entry `index` of the table, `None` when out of range.
    pub fn get(self, index: u8) -> Option<&'static str> {
        self.table().entries.get(index as usize).copied()
    }
}

/// Static definition of one of the 66 characters stored in a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActorInfo {
    pub name: &'static str,
    pub hat_parts: TableId,
    pub colors: TableId,
}

const fn actor(name: &'static str) -> ActorInfo {
    ActorInfo {
        name,
        hat_parts: TableId::HAT_PARTS,
        colors: TableId::COLORS,
    }
}

const fn ghost(name: &'static str) -> ActorInfo {
    ActorInfo {
        name,
        hat_parts: TableId::GHOST_HATS,
        colors: TableId::GHOST_COLORS,
    }
}

/// Number of character records in every save.
pub const ACTOR_COUNT: usize = 66;

/// Character definitions in save-record order.
pub static ACTORS: [ActorInfo; ACTOR_COUNT] = [
    ActorInfo {
        name: "pepper",
        hat_parts: TableId::PEPPER_HATS,
        colors: TableId::COLORS,
    },
    actor("mama"),
    actor("papa"),
    actor("nick"),
    actor("laura"),
    actor("infoman"),
    actor("brickstr"),
    actor("studs"),
    actor("rhoda"),
    actor("valerie"),
    actor("snap"),
    actor("pt"),
    actor("mg"),
    actor("bu"),
    actor("ml"),
    actor("nu"),
    actor("na"),
    actor("cl"),
    actor("en"),
    actor("re"),
    actor("ro"),
    actor("d1"),
    actor("d2"),
    actor("d3"),
    actor("d4"),
    actor("l1"),
    actor("l2"),
    actor("l3"),
    actor("l4"),
    actor("l5"),
    actor("l6"),
    actor("b1"),
    actor("b2"),
    actor("b3"),
    actor("b4"),
    actor("cm"),
    actor("gd"),
    actor("rd"),
    actor("pg"),
    actor("bd"),
    actor("sy"),
    actor("gn"),
    actor("df"),
    actor("bs"),
    actor("lt"),
    actor("st"),
    actor("bm"),
    actor("jk"),
    ghost("ghost"),
    ghost("ghost01"),
    ghost("ghost02"),
    ghost("ghost03"),
    ghost("ghost04"),
    ghost("ghost05"),
    actor("hg"),
    actor("pntgy"),
    actor("pep"),
    actor("cop01"),
    actor("actor_01"),
    actor("actor_02"),
    actor("actor_03"),
    actor("actor_04"),
    actor("actor_05"),
    actor("btmncycl"),
    actor("cboycycl"),
    actor("boatman"),
];

pub fn actor_info(index: usize) -> Option<&'static ActorInfo> {
    ACTORS.get(index)
}

/// Record index and definition of the character called `name`.
pub fn find_actor(name: &str) -> Option<(usize, &'static ActorInfo)> {
    ACTORS
        .iter()
        .enumerate()
        .find(|(_, info)| info.name.eq_ignore_ascii_case(name))
}

const PLAYABLE: [&str; 5] = ["Pepper", "Mama", "Papa", "Nick", "Laura"];

/// Display name of a playable actor id (1-5) as stored in the save header.
///
/// ```
/// assert_eq!(isle_save::actor_name(1), Some("Pepper"));
/// assert_eq!(isle_save::actor_name(0), None);
/// ```
pub fn actor_name(actor_id: u8) -> Option<&'static str> {
    (actor_id as usize)
        .checked_sub(1)
        .and_then(|index| PLAYABLE.get(index).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_table_shape() {
        assert_eq!(ACTORS.len(), 66);
        assert_eq!(ACTORS[0].name, "pepper");
        assert_eq!(ACTORS[65].name, "boatman");
        assert_eq!(find_actor("GHOST03").map(|(index, _)| index), Some(51));
    }

    #[test]
    fn test_tables_are_shared() {
        assert_eq!(ACTORS[1].colors, ACTORS[40].colors);
        assert!(std::ptr::eq(ACTORS[1].colors.table(), ACTORS[40].colors.table()));
        assert_ne!(ACTORS[0].hat_parts, ACTORS[1].hat_parts);
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(TableId::COLORS.get(3), Some("lego red"));
        assert_eq!(TableId::COLORS.get(8), None);
        assert_eq!(TableId::GHOST_HATS.table().name, "ghost hats");
    }

    #[test]
    fn test_playable_names() {
        let names: Vec<_> = (1..=5).filter_map(actor_name).collect();
        assert_eq!(names, vec!["Pepper", "Mama", "Papa", "Nick", "Laura"]);
        assert_eq!(actor_name(6), None);
    }
}
