//! Store branch directory

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Branch {
    pub id: u32,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub address: &'static str,
}

const BRANCHES: [Branch; 5] = [
    Branch {
        id: 1,
        name: "Tel Aviv branch",
        lat: 32.07529427507578,
        lng: 34.77478840967926,
        address: "Rothschild Blvd 45, Tel Aviv",
    },
    Branch {
        id: 2,
        name: "Jerusalem branch",
        lat: 31.7683,
        lng: 35.2137,
        address: "Jaffa St 23, Jerusalem",
    },
    Branch {
        id: 3,
        name: "Haifa branch",
        lat: 32.7940,
        lng: 34.9896,
        address: "Ben Gurion Ave 12, Haifa",
    },
    Branch {
        id: 4,
        name: "Eilat branch",
        lat: 29.5577,
        lng: 34.9519,
        address: "Coral Beach St 8, Eilat",
    },
    Branch {
        id: 5,
        name: "Beer Sheva branch",
        lat: 31.2529,
        lng: 34.7915,
        address: "Rager Blvd 15, Beer Sheva",
    },
];

impl Branch {
    pub fn all() -> &'static [Branch] {
        &BRANCHES
    }

    pub fn find(id: u32) -> Option<&'static Branch> {
        BRANCHES.iter().find(|branch| branch.id == id)
    }

    /// Where the map opens: the first branch
    pub fn default_center() -> (f64, f64) {
        let first = &BRANCHES[0];
        (first.lat, first.lng)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}
