/// Upper bound of the population-density input accepted for a run.
pub const POPULATION_MAX: f64 = 100_000.0;

/// Upper bound of the population-density slider. Fetched densities above it
/// are still submitted as fetched; only the displayed value is clamped.
pub const POPULATION_SLIDER_MAX: f64 = 10_000.0;

pub const DIAMETER_RANGE_KM: (f64, f64) = (0.001, 1000.0);
pub const VELOCITY_RANGE_KM_S: (f64, f64) = (11.0, 72.0);
pub const ANGLE_RANGE_DEG: (f64, f64) = (0.0, 90.0);

/// Impactor material, identified by bulk density.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Composition {
    Ice,
    PorousRock,
    DenseRock,
    Iron,
}

impl Composition {
    pub const ALL: [Composition; 4] = [
        Composition::Ice,
        Composition::PorousRock,
        Composition::DenseRock,
        Composition::Iron,
    ];

    pub fn density_kg_m3(self) -> f64 {
        match self {
            Composition::Ice => 1000.0,
            Composition::PorousRock => 1500.0,
            Composition::DenseRock => 3000.0,
            Composition::Iron => 8000.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Composition::Ice => "Ice",
            Composition::PorousRock => "Porous rock",
            Composition::DenseRock => "Dense rock",
            Composition::Iron => "Iron",
        }
    }

    pub fn from_density(density_kg_m3: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.density_kg_m3() == density_kg_m3)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Diameter,
    Velocity,
    Angle,
    PopulationDensity,
    Composition,
}

impl Field {
    pub fn message(self) -> &'static str {
        match self {
            Field::Diameter => "Please enter a diameter between 0.001 km and 1000 km.",
            Field::Velocity => "Velocity must be between 11 and 72 km/s.",
            Field::Angle => "Angle must be between 0 and 90 degrees.",
            Field::PopulationDensity => {
                "Enter a population density between 0 and 100,000 people per km²."
            }
            Field::Composition => "Please select a valid asteroid material.",
        }
    }
}

/// One invalid input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            message: field.message(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for FieldError {}

/// User-tunable impactor inputs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimulationParameters {
    pub diameter_km: f64,
    pub velocity_km_s: f64,
    pub angle_deg: f64,
    pub density_kg_m3: f64,
    pub population_density_per_km2: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            diameter_km: 1.0,
            velocity_km_s: 20.0,
            angle_deg: 45.0,
            density_kg_m3: Composition::DenseRock.density_kg_m3(),
            population_density_per_km2: 100.0,
        }
    }
}

impl SimulationParameters {
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Diameter => self.diameter_km,
            Field::Velocity => self.velocity_km_s,
            Field::Angle => self.angle_deg,
            Field::PopulationDensity => self.population_density_per_km2,
            Field::Composition => self.density_kg_m3,
        }
    }

    /// Checks every field; all failures are reported, not just the first.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = [
            Field::Diameter,
            Field::Velocity,
            Field::Angle,
            Field::PopulationDensity,
            Field::Composition,
        ]
        .into_iter()
        .filter(|f| !validate_field(*f, self.value(*f)))
        .map(FieldError::new)
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `true` if `value` is acceptable for `field`. NaN never is.
pub fn validate_field(field: Field, value: f64) -> bool {
    let within = |(min, max): (f64, f64)| value >= min && value <= max;
    match field {
        Field::Diameter => within(DIAMETER_RANGE_KM),
        Field::Velocity => within(VELOCITY_RANGE_KM_S),
        Field::Angle => within(ANGLE_RANGE_DEG),
        Field::PopulationDensity => within((0.0, POPULATION_MAX)),
        Field::Composition => Composition::from_density(value).is_some(),
    }
}

/// Slider position for a fetched density.
pub fn population_slider_value(density: f64) -> f64 {
    density.clamp(0.0, POPULATION_SLIDER_MAX)
}
