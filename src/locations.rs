//! Static location catalog and random role dealing.
//!
//! Pure lookups, no state. Role picks are independent per call, so two
//! non-spy players can legitimately end up with the same role.

use crate::types::Location;
use rand::Rng;

/// The full catalog: each location with its six roles
const LOCATIONS: &[(&str, [&str; 6])] = &[
    ("Airplane", ["Passenger", "Flight Attendant", "Pilot", "Air Marshal", "Economy Passenger", "First Class Passenger"]),
    ("Bank", ["Customer", "Teller", "Manager", "Security Guard", "Robber", "Consultant"]),
    ("Beach", ["Sunbather", "Lifeguard", "Surfer", "Ice Cream Vendor", "Beach Volleyball Player", "Tourist"]),
    ("Casino", ["Gambler", "Dealer", "Bartender", "Security Guard", "Manager", "Hustler"]),
    ("Cathedral", ["Priest", "Visitor", "Sinner", "Beggar", "Tourist", "Choir Singer"]),
    ("Circus", ["Acrobat", "Animal Trainer", "Clown", "Magician", "Fire Eater", "Visitor"]),
    ("Corporate Party", ["Employee", "Manager", "Party Entertainer", "Caterer", "Intern", "Accountant"]),
    ("Crusader Army", ["Monk", "Knight", "Squire", "Archer", "Servant", "Bishop"]),
    ("Day Spa", ["Customer", "Masseuse", "Manicurist", "Beautician", "Dermatologist", "Stylist"]),
    ("Embassy", ["Ambassador", "Security Guard", "Secretary", "Refugee", "Diplomat", "Government Official"]),
    ("Hospital", ["Nurse", "Doctor", "Patient", "Surgeon", "Anesthesiologist", "Intern"]),
    ("Hotel", ["Guest", "Receptionist", "Bellhop", "Manager", "Housekeeper", "Security Guard"]),
    ("Military Base", ["Soldier", "Colonel", "Medic", "Deserter", "Officer", "Tank Engineer"]),
    ("Movie Studio", ["Actor", "Director", "Camera Operator", "Stunt Double", "Producer", "Costume Artist"]),
    ("Ocean Liner", ["Captain", "Passenger", "Bartender", "Cook", "Musician", "Waiter"]),
    ("Passenger Train", ["Passenger", "Conductor", "Mechanic", "Restaurant Chef", "Engineer", "Stoker"]),
    ("Pirate Ship", ["Captain", "Sailor", "Cook", "Slave", "Cannoneer", "Prisoner"]),
    ("Polar Station", ["Medic", "Geologist", "Expedition Leader", "Biologist", "Radioman", "Hydrologist"]),
    ("Police Station", ["Detective", "Officer", "Criminal", "Lawyer", "Journalist", "Criminalist"]),
    ("Restaurant", ["Chef", "Waiter", "Customer", "Critic", "Host", "Dishwasher"]),
    ("School", ["Teacher", "Student", "Principal", "Security Guard", "Janitor", "Lunch Lady"]),
    ("Service Station", ["Customer", "Mechanic", "Tire Specialist", "Manager", "Car Washer", "Electrician"]),
    ("Space Station", ["Engineer", "Astronaut", "Commander", "Scientist", "Doctor", "Space Tourist"]),
    ("Submarine", ["Captain", "Sailor", "Sonar Technician", "Cook", "Navigator", "Radioman"]),
    ("Supermarket", ["Customer", "Cashier", "Manager", "Stock Clerk", "Security Guard", "Janitor"]),
    ("Theater", ["Actor", "Director", "Prompter", "Stagehand", "Coat Check", "Viewer"]),
    ("University", ["Professor", "Student", "Dean", "Janitor", "Researcher", "Librarian"]),
    ("Art Museum", ["Visitor", "Tour Guide", "Security Guard", "Curator", "Artist", "Art Critic"]),
    ("Zoo", ["Visitor", "Zookeeper", "Veterinarian", "Tour Guide", "Photographer", "Concession Worker"]),
    ("Library", ["Student", "Librarian", "IT Support", "Researcher", "Janitor", "Book Club Member"]),
    ("Amusement Park", ["Visitor", "Ride Operator", "Park Manager", "Food Vendor", "Mascot", "Ticket Seller"]),
    ("Gym", ["Member", "Personal Trainer", "Receptionist", "Yoga Instructor", "Maintenance", "Nutritionist"]),
    ("Rock Concert", ["Fan", "Musician", "Roadie", "Security Guard", "Sound Engineer", "Merchandise Seller"]),
    ("Jazz Club", ["Musician", "Bartender", "Patron", "Waiter", "Manager", "Singer"]),
    ("Construction Site", ["Worker", "Foreman", "Architect", "Engineer", "Inspector", "Driver"]),
    ("Fire Station", ["Firefighter", "Fire Chief", "Paramedic", "Dispatcher", "Instructor", "Inspector"]),
    ("Ski Resort", ["Skier", "Ski Instructor", "Lift Operator", "Chalet Staff", "Ski Patrol", "Equipment Rental"]),
    ("Haunted House", ["Visitor", "Actor", "Ticket Seller", "Manager", "Special Effects Tech", "Security"]),
    ("Broadway Show", ["Actor", "Director", "Audience Member", "Usher", "Stage Manager", "Makeup Artist"]),
    ("Fashion Show", ["Model", "Designer", "Photographer", "Makeup Artist", "Audience", "Stylist"]),
    ("Coffee Shop", ["Barista", "Customer", "Manager", "Regular", "Student", "Remote Worker"]),
    ("Recording Studio", ["Musician", "Producer", "Sound Engineer", "Manager", "Intern", "Session Player"]),
    ("Vineyard", ["Vintner", "Tourist", "Sommelier", "Harvest Worker", "Tour Guide", "Restaurant Chef"]),
    ("Escape Room", ["Player", "Game Master", "Designer", "Actor", "Receptionist", "Maintenance"]),
    ("News Station", ["Anchor", "Camera Operator", "Producer", "Intern", "Weather Person", "Reporter"]),
    ("Farmer's Market", ["Vendor", "Shopper", "Organizer", "Musician", "Food Truck Owner", "Produce Farmer"]),
    ("Courtroom", ["Judge", "Lawyer", "Defendant", "Jury Member", "Stenographer", "Bailiff"]),
    ("Airport", ["Passenger", "TSA Agent", "Pilot", "Gate Agent", "Customs Officer", "Janitor"]),
    ("Veterinary Clinic", ["Vet", "Pet Owner", "Vet Tech", "Receptionist", "Groomer", "Pet"]),
    ("Camping Site", ["Camper", "Park Ranger", "Tour Guide", "Wildlife", "Hiker", "Campground Host"]),
];

/// Pick one location uniformly at random from the catalog
pub fn pick_random_location() -> Location {
    let mut rng = rand::rng();
    let (name, roles) = LOCATIONS[rng.random_range(0..LOCATIONS.len())];
    Location {
        name: name.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

/// Pick one role uniformly at random from a location's role list
pub fn pick_random_role(location: &Location) -> String {
    let mut rng = rand::rng();
    location.roles[rng.random_range(0..location.roles.len())].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_is_large_enough_for_variety() {
        assert!(LOCATIONS.len() >= 40);
    }

    #[test]
    fn every_location_has_six_distinct_roles() {
        for (name, roles) in LOCATIONS {
            let distinct: HashSet<_> = roles.iter().collect();
            assert_eq!(distinct.len(), 6, "duplicate role in {}", name);
        }
    }

    #[test]
    fn picked_location_comes_from_catalog() {
        for _ in 0..20 {
            let location = pick_random_location();
            assert!(LOCATIONS.iter().any(|(name, _)| *name == location.name));
            assert_eq!(location.roles.len(), 6);
        }
    }

    #[test]
    fn picked_role_belongs_to_location() {
        let location = pick_random_location();
        for _ in 0..20 {
            let role = pick_random_role(&location);
            assert!(location.roles.contains(&role));
        }
    }
}
