//! Static team-strength tables driving the synthetic generators and the
//! prediction arithmetic. Strength is a 0–100 scalar, not a rating system.

use crate::models::League;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamEntry {
    pub name: &'static str,
    pub abbr: &'static str,
    pub conference: &'static str,
    pub division: &'static str,
    pub strength: f64,
}

/// Strength assumed for teams missing from the tables.
pub const DEFAULT_STRENGTH: f64 = 75.0;

const fn team(
    name: &'static str,
    abbr: &'static str,
    conference: &'static str,
    division: &'static str,
    strength: f64,
) -> TeamEntry {
    TeamEntry { name, abbr, conference, division, strength }
}

pub const NFL_TEAMS: &[TeamEntry] = &[
    team("Buffalo Bills", "BUF", "AFC", "East", 90.0),
    team("Miami Dolphins", "MIA", "AFC", "East", 78.0),
    team("New England Patriots", "NE", "AFC", "East", 74.0),
    team("New York Jets", "NYJ", "AFC", "East", 72.0),
    team("Baltimore Ravens", "BAL", "AFC", "North", 89.0),
    team("Cincinnati Bengals", "CIN", "AFC", "North", 83.0),
    team("Pittsburgh Steelers", "PIT", "AFC", "North", 80.0),
    team("Cleveland Browns", "CLE", "AFC", "North", 68.0),
    team("Houston Texans", "HOU", "AFC", "South", 84.0),
    team("Indianapolis Colts", "IND", "AFC", "South", 77.0),
    team("Jacksonville Jaguars", "JAX", "AFC", "South", 73.0),
    team("Tennessee Titans", "TEN", "AFC", "South", 66.0),
    team("Kansas City Chiefs", "KC", "AFC", "West", 92.0),
    team("Los Angeles Chargers", "LAC", "AFC", "West", 82.0),
    team("Denver Broncos", "DEN", "AFC", "West", 79.0),
    team("Las Vegas Raiders", "LV", "AFC", "West", 70.0),
    team("Philadelphia Eagles", "PHI", "NFC", "East", 91.0),
    team("Washington Commanders", "WSH", "NFC", "East", 83.0),
    team("Dallas Cowboys", "DAL", "NFC", "East", 78.0),
    team("New York Giants", "NYG", "NFC", "East", 69.0),
    team("Detroit Lions", "DET", "NFC", "North", 90.0),
    team("Green Bay Packers", "GB", "NFC", "North", 85.0),
    team("Minnesota Vikings", "MIN", "NFC", "North", 84.0),
    team("Chicago Bears", "CHI", "NFC", "North", 75.0),
    team("Tampa Bay Buccaneers", "TB", "NFC", "South", 81.0),
    team("Atlanta Falcons", "ATL", "NFC", "South", 77.0),
    team("New Orleans Saints", "NO", "NFC", "South", 71.0),
    team("Carolina Panthers", "CAR", "NFC", "South", 67.0),
    team("San Francisco 49ers", "SF", "NFC", "West", 86.0),
    team("Los Angeles Rams", "LAR", "NFC", "West", 83.0),
    team("Seattle Seahawks", "SEA", "NFC", "West", 80.0),
    team("Arizona Cardinals", "ARI", "NFC", "West", 76.0),
];

pub const FBS_TEAMS: &[TeamEntry] = &[
    team("Georgia Bulldogs", "UGA", "SEC", "East", 94.0),
    team("Ohio State Buckeyes", "OSU", "Big Ten", "", 93.0),
    team("Texas Longhorns", "TEX", "SEC", "", 92.0),
    team("Oregon Ducks", "ORE", "Big Ten", "", 91.0),
    team("Alabama Crimson Tide", "ALA", "SEC", "West", 90.0),
    team("Notre Dame Fighting Irish", "ND", "Independent", "", 89.0),
    team("Penn State Nittany Lions", "PSU", "Big Ten", "", 88.0),
    team("Michigan Wolverines", "MICH", "Big Ten", "", 85.0),
    team("Tennessee Volunteers", "TENN", "SEC", "East", 85.0),
    team("Ole Miss Rebels", "MISS", "SEC", "West", 84.0),
    team("Clemson Tigers", "CLEM", "ACC", "Atlantic", 84.0),
    team("LSU Tigers", "LSU", "SEC", "West", 83.0),
    team("Miami Hurricanes", "MIA", "ACC", "Coastal", 83.0),
    team("Missouri Tigers", "MIZ", "SEC", "East", 81.0),
    team("Boise State Broncos", "BSU", "Mountain West", "", 80.0),
    team("SMU Mustangs", "SMU", "ACC", "", 79.0),
    team("USC Trojans", "USC", "Big Ten", "", 79.0),
    team("Arizona State Sun Devils", "ASU", "Big 12", "", 78.0),
    team("Florida State Seminoles", "FSU", "ACC", "Atlantic", 78.0),
    team("Utah Utes", "UTAH", "Big 12", "", 77.0),
    team("Kansas State Wildcats", "KSU", "Big 12", "", 77.0),
    team("Iowa State Cyclones", "ISU", "Big 12", "", 76.0),
    team("Washington Huskies", "UW", "Big Ten", "", 76.0),
    team("Oklahoma Sooners", "OU", "SEC", "", 75.0),
];

pub fn roster(league: League) -> &'static [TeamEntry] {
    match league {
        League::Nfl => NFL_TEAMS,
        League::College => FBS_TEAMS,
    }
}

/// Look a team up by exact name or abbreviation, falling back to a substring
/// match so "Chiefs" or "Georgia" still resolve.
pub fn find(league: League, query: &str) -> Option<&'static TeamEntry> {
    let roster = roster(league);
    let exact = roster.iter().find(|t| {
        t.name.eq_ignore_ascii_case(query) || t.abbr.eq_ignore_ascii_case(query)
    });
    if exact.is_some() {
        return exact;
    }
    let needle = query.to_lowercase();
    roster
        .iter()
        .find(|t| t.name.to_lowercase().contains(&needle))
}
