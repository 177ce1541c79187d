//! Built-in Medellín network definition.
//!
//! Lines A/B are heavy rail, H/J/K/L/M/P are aerial cable cars, TA is
//! the Ayacucho tram and line 1 is the Metroplús busway. Coordinates
//! are WGS84.

use std::collections::BTreeMap;

use crate::domain::{LineCode, StationName, TransportKind};
use crate::geo::Coordinate;

use super::{Line, Topology};

fn station(name: &str) -> StationName {
    StationName::parse(name).expect("built-in station name is valid")
}

fn line(code: &str, transport: TransportKind, color: &str, stations: &[&str]) -> Line {
    Line {
        code: LineCode::parse(code).expect("built-in line code is valid"),
        transport,
        color: color.to_string(),
        stations: stations.iter().map(|s| station(s)).collect(),
    }
}

/// The default network: the Medellín metro, cable cars, tram and
/// busway, with curated walking transfers in the city center.
pub fn medellin() -> Topology {
    let lines = vec![
        line(
            "A",
            TransportKind::Metro,
            "#007bff",
            &[
                "Niquía",
                "Bello",
                "Madera",
                "Acevedo",
                "Tricentenario",
                "Caribe",
                "Universidad",
                "Hospital",
                "Prado",
                "Parque Berrío",
                "San Antonio",
                "Alpujarra",
                "Exposiciones",
                "Industriales",
                "Poblado",
                "Aguacatala",
                "Ayurá",
                "Envigado",
                "Itagüí",
                "Sabaneta",
                "La Estrella",
            ],
        ),
        line(
            "B",
            TransportKind::Metro,
            "#fd7e14",
            &[
                "San Antonio",
                "Cisneros",
                "Suramericana",
                "Estadio",
                "Floresta",
                "Santa Lucía",
                "San Javier",
            ],
        ),
        line(
            "H",
            TransportKind::Cable,
            "#e83e8c",
            &["Oriente", "Las Torres", "Villa Sierra"],
        ),
        line(
            "J",
            TransportKind::Cable,
            "#ffc107",
            &["San Javier", "Juan XXIII", "Vallejuelos", "La Aurora"],
        ),
        line(
            "K",
            TransportKind::Cable,
            "#28a745",
            &["Acevedo", "Andalucía", "Popular", "Santo Domingo"],
        ),
        line(
            "L",
            TransportKind::Cable,
            "#8B4513",
            &["Santo Domingo", "Arví"],
        ),
        line(
            "M",
            TransportKind::Cable,
            "#6f42c1",
            &["Miraflores", "Trece de Noviembre"],
        ),
        line(
            "P",
            TransportKind::Cable,
            "#dc3545",
            &["Acevedo", "Sena", "Doce de Octubre", "El Progreso"],
        ),
        line(
            "TA",
            TransportKind::Tram,
            "#28a745",
            &[
                "San Antonio",
                "San José",
                "Pabellón del Agua EPM",
                "Bicentenario",
                "Buenos Aires",
                "Miraflores",
                "Loyola",
                "Alejandro Echavarría",
                "Oriente",
            ],
        ),
        line(
            "1",
            TransportKind::Bus,
            "#20c997",
            &[
                "Parque Aranjuez",
                "Berlín",
                "Manrique",
                "Gardel",
                "Palos Verdes",
                "Hospital",
                "Cisneros",
                "Industriales",
            ],
        ),
    ];

    let coordinates: BTreeMap<StationName, Coordinate> = [
        // Line A
        ("Niquía", 6.3408, -75.5548),
        ("Bello", 6.3337, -75.5583),
        ("Madera", 6.3209, -75.5589),
        ("Acevedo", 6.3119, -75.5578),
        ("Tricentenario", 6.3047, -75.5647),
        ("Caribe", 6.2947, -75.5705),
        ("Universidad", 6.2726, -75.5687),
        ("Hospital", 6.2684, -75.5666),
        ("Prado", 6.2605, -75.5647),
        ("Parque Berrío", 6.2512, -75.5686),
        ("San Antonio", 6.2471, -75.5692),
        ("Alpujarra", 6.2442, -75.5724),
        ("Exposiciones", 6.2401, -75.5748),
        ("Industriales", 6.2309, -75.5766),
        ("Poblado", 6.2137, -75.5777),
        ("Aguacatala", 6.1983, -75.5789),
        ("Ayurá", 6.1859, -75.5793),
        ("Envigado", 6.1766, -75.5911),
        ("Itagüí", 6.1636, -75.5992),
        ("Sabaneta", 6.1516, -75.6157),
        ("La Estrella", 6.1395, -75.6336),
        // Line B
        ("Cisneros", 6.2512, -75.5725),
        ("Suramericana", 6.2507, -75.5812),
        ("Estadio", 6.2507, -75.5873),
        ("Floresta", 6.2507, -75.5934),
        ("Santa Lucía", 6.2507, -75.5995),
        ("San Javier", 6.2507, -75.6056),
        // Line H
        ("Oriente", 6.2442, -75.5559),
        ("Las Torres", 6.2442, -75.5512),
        ("Villa Sierra", 6.2442, -75.5465),
        // Line J
        ("Juan XXIII", 6.2576, -75.6117),
        ("Vallejuelos", 6.2645, -75.6178),
        ("La Aurora", 6.2714, -75.6239),
        // Line K
        ("Andalucía", 6.3119, -75.5531),
        ("Popular", 6.3119, -75.5484),
        ("Santo Domingo", 6.3119, -75.5437),
        // Line L
        ("Arví", 6.2839, -75.4997),
        // Line M
        ("Miraflores", 6.2375, -75.5559),
        ("Trece de Noviembre", 6.2375, -75.5512),
        // Line P
        ("Sena", 6.3119, -75.5625),
        ("Doce de Octubre", 6.3119, -75.5672),
        ("El Progreso", 6.3119, -75.5719),
        // Tram TA
        ("San José", 6.2442, -75.5653),
        ("Pabellón del Agua EPM", 6.2442, -75.5606),
        ("Bicentenario", 6.2442, -75.5606),
        ("Buenos Aires", 6.2442, -75.5559),
        ("Loyola", 6.2442, -75.5512),
        ("Alejandro Echavarría", 6.2442, -75.5465),
        // Metroplús line 1
        ("Parque Aranjuez", 6.2930, -75.5510),
        ("Berlín", 6.2825, -75.5545),
        ("Manrique", 6.2705, -75.5570),
        ("Gardel", 6.2640, -75.5590),
        ("Palos Verdes", 6.2575, -75.5610),
    ]
    .into_iter()
    .map(|(name, lat, lon)| (station(name), Coordinate::new(lat, lon)))
    .collect();

    // Street-level walking links between distinct nearby stations on
    // different lines.
    let transfers = vec![
        (station("Exposiciones"), station("San José")),
        (station("Cisneros"), station("Alpujarra")),
    ];

    Topology::new(lines, coordinates, transfers).expect("built-in Medellín network is valid")
}
