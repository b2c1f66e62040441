// Estructuras de datos principales: resultado del análisis de un archivo,
// agregados por ciudad y el registro persistido.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Valor por defecto de los campos descriptivos ausentes.
pub const NOT_AVAILABLE: &str = "N/A";

/// Tope de cualquier conteo de voluntarios; cabe en un INTEGER de SQLite.
pub const MAX_COUNT: u64 = i64::MAX as u64;

/// Suma de conteos que se queda en `MAX_COUNT` en lugar de desbordar.
pub fn add_counts(a: u64, b: u64) -> u64 {
    a.saturating_add(b).min(MAX_COUNT)
}

/// Resultado de normalizar una fila aceptada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub city: String,
    pub category: String,
    pub volunteers_male: u64,
    pub volunteers_female: u64,
    pub volunteers: u64,
    pub opportunity_number: String,
    pub opportunity_name: String,
    pub opportunity_leader: String,
    pub start_date: String,
    pub end_date: String,
}

impl NormalizedEntry {
    pub fn detail(&self) -> DetailRecord {
        DetailRecord {
            opportunity_number: self.opportunity_number.clone(),
            opportunity_name: self.opportunity_name.clone(),
            opportunity_leader: self.opportunity_leader.clone(),
            city: self.city.clone(),
            category: self.category.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            volunteers: self.volunteers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: u64,
    pub color: String,
}

/// Una fila aceptada, conservada tal cual para la exportación posterior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(default = "not_available")]
    pub opportunity_number: String,
    #[serde(default = "not_available")]
    pub opportunity_name: String,
    #[serde(default = "not_available")]
    pub opportunity_leader: String,
    #[serde(default)]
    pub city: String,
    // older records were stored without the category
    #[serde(default)]
    pub category: String,
    #[serde(default = "not_available")]
    pub start_date: String,
    #[serde(default = "not_available")]
    pub end_date: String,
    #[serde(default)]
    pub volunteers: u64,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityAggregate {
    /// Totales por categoría, en orden de primera aparición.
    #[serde(rename = "data", default)]
    pub category_totals: Vec<CategoryTotal>,
    #[serde(rename = "totalVolunteers", default)]
    pub total_volunteers: u64,
    #[serde(rename = "categoriesFound", default)]
    pub categories_found: u64,
    #[serde(default)]
    pub details: Vec<DetailRecord>,
}

impl CityAggregate {
    /// Acumula una fila aceptada. `color` sólo se usa cuando la categoría
    /// aparece por primera vez en esta ciudad.
    pub fn record(&mut self, entry: &NormalizedEntry, color: &str) {
        match self.category_totals.iter_mut().find(|c| c.name == entry.category) {
            Some(existing) => existing.value = add_counts(existing.value, entry.volunteers),
            None => {
                self.category_totals.push(CategoryTotal {
                    name: entry.category.clone(),
                    value: entry.volunteers,
                    color: color.to_string(),
                });
                self.categories_found += 1;
            }
        }
        self.total_volunteers = add_counts(self.total_volunteers, entry.volunteers);
        self.details.push(entry.detail());
    }
}

/// Mapa ciudad -> agregado que conserva el orden de inserción, también al
/// pasar por JSON (se serializa como objeto).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityMap {
    entries: Vec<(String, CityAggregate)>,
}

impl CityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, city: &str) -> Option<&CityAggregate> {
        self.entries.iter().find(|(name, _)| name == city).map(|(_, agg)| agg)
    }

    pub fn contains(&self, city: &str) -> bool {
        self.get(city).is_some()
    }

    /// Devuelve el agregado de `city`, insertándolo vacío al final si no existe.
    pub fn get_or_insert(&mut self, city: &str) -> &mut CityAggregate {
        let idx = match self.entries.iter().position(|(name, _)| name == city) {
            Some(idx) => idx,
            None => {
                self.entries.push((city.to_string(), CityAggregate::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn insert(&mut self, city: String, aggregate: CityAggregate) {
        match self.entries.iter_mut().find(|(name, _)| *name == city) {
            Some((_, existing)) => *existing = aggregate,
            None => self.entries.push((city, aggregate)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CityAggregate)> {
        self.entries.iter().map(|(name, agg)| (name.as_str(), agg))
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (city, aggregate) in &self.entries {
            map.serialize_entry(city, aggregate)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CityMapVisitor;

        impl<'de> Visitor<'de> for CityMapVisitor {
            type Value = CityMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping city names to aggregates")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CityMap, A::Error> {
                let mut out = CityMap::new();
                while let Some((city, aggregate)) = access.next_entry::<String, CityAggregate>()? {
                    out.insert(city, aggregate);
                }
                Ok(out)
            }

            // los registros antiguos sin datos se guardaban como null
            fn visit_unit<E: serde::de::Error>(self) -> Result<CityMap, E> {
                Ok(CityMap::new())
            }
        }

        deserializer.deserialize_any(CityMapVisitor)
    }
}

/// Resultado completo del análisis de un archivo subido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAnalysis {
    pub detected_month: u32,
    pub detected_year: i32,
    pub all_cities_data: CityMap,
    pub total_volunteers_all_cities: u64,
    /// Cuenta filas aceptadas, no categorías distintas.
    pub total_categories_found: u64,
    pub cities_count: usize,
}

impl UploadAnalysis {
    pub fn new(detected_month: u32, detected_year: i32) -> Self {
        UploadAnalysis {
            detected_month,
            detected_year,
            all_cities_data: CityMap::new(),
            total_volunteers_all_cities: 0,
            total_categories_found: 0,
            cities_count: 0,
        }
    }

    /// Incorpora una fila aceptada al agregado.
    pub fn fold(&mut self, entry: &NormalizedEntry, color: &str) {
        self.all_cities_data.get_or_insert(&entry.city).record(entry, color);
        self.total_volunteers_all_cities =
            add_counts(self.total_volunteers_all_cities, entry.volunteers);
        self.total_categories_found += 1;
        self.cities_count = self.all_cities_data.len();
    }
}

/// Registro persistido, una fila por archivo subido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub id: i64,
    pub filename: String,
    pub upload_date: String,
    pub month: u32,
    pub year: i32,
    pub cities_count: i64,
    pub total_volunteers: i64,
    pub data: CityMap,
    pub checksum: String,
    pub uploaded_by: String,
}

/// Vista de listado: el registro sin `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub id: i64,
    pub filename: String,
    pub upload_date: String,
    pub month: u32,
    pub year: i32,
    pub cities_count: i64,
    pub total_volunteers: i64,
    pub uploaded_by: String,
    pub checksum: String,
}

/// Datos para crear un registro; `id` y `upload_date` los asigna el almacenamiento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatisticsRecord {
    pub filename: String,
    pub month: u32,
    pub year: i32,
    pub cities_count: i64,
    pub total_volunteers: i64,
    pub data: CityMap,
    pub checksum: String,
    pub uploaded_by: String,
}

/// Fila plana de la exportación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub opportunity_number: String,
    pub opportunity_leader: String,
    pub opportunity_name: String,
    pub start_date: String,
    pub end_date: String,
    pub volunteers: u64,
}
