//! In-memory employee table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::dataset::Dataset;
use super::employee::{ActiveStatus, Department, Employee};
use crate::error::Result;
use crate::features::{FeatureEngine, FeatureSet};
use crate::scoring::RiskLevel;

/// Row filter; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    pub department: Option<Department>,
    pub risk_level: Option<RiskLevel>,
    pub status: Option<ActiveStatus>,
    /// Case-insensitive substring of name or role
    pub query: Option<String>,
}

impl EmployeeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn department(mut self, department: Department) -> Self {
        self.department = Some(department);
        self
    }

    pub fn risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = Some(level);
        self
    }

    pub fn status(mut self, status: ActiveStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        if self.department.is_some_and(|d| d != employee.department) {
            return false;
        }
        if self.risk_level.is_some_and(|l| l != employee.risk_level) {
            return false;
        }
        if self.status.is_some_and(|s| s != employee.status) {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                employee.name.to_lowercase().contains(&q) || employee.role.to_lowercase().contains(&q)
            }
            _ => true,
        }
    }
}

/// Immutable table of employees, one row each
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    employees: Vec<Employee>,
}

impl Population {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.employees.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Rows matching `filter`; an empty result is a valid table
    pub fn filter(&self, filter: &EmployeeFilter) -> Population {
        Population {
            employees: self
                .employees
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect(),
        }
    }

    /// Rows ordered by descending risk score, then descending performance
    pub fn ranked_by_risk(&self) -> Vec<&Employee> {
        let mut rows: Vec<&Employee> = self.employees.iter().collect();
        rows.sort_by(|a, b| {
            b.risk_score
                .total_cmp(&a.risk_score)
                .then(b.performance.total_cmp(&a.performance))
        });
        rows
    }

    /// Headcount per risk level, every level present
    pub fn level_counts(&self) -> BTreeMap<RiskLevel, usize> {
        let mut counts: BTreeMap<RiskLevel, usize> =
            RiskLevel::ALL.iter().map(|&l| (l, 0)).collect();
        for e in &self.employees {
            *counts.entry(e.risk_level).or_insert(0) += 1;
        }
        counts
    }

    /// Headcount per department, every department present
    pub fn department_counts(&self) -> BTreeMap<Department, usize> {
        let mut counts: BTreeMap<Department, usize> =
            Department::ALL.iter().map(|&d| (d, 0)).collect();
        for e in &self.employees {
            *counts.entry(e.department).or_insert(0) += 1;
        }
        counts
    }

    /// Project the table onto a numeric feature set
    pub fn to_dataset(&self, feature_set: FeatureSet) -> Dataset {
        FeatureEngine::new(feature_set).generate(self)
    }

    /// Save to CSV file, one header row plus one line per employee
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for employee in &self.employees {
            writer.serialize(employee)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Load from a CSV file written by [`Population::save_csv`]
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let employees = reader
            .deserialize()
            .collect::<std::result::Result<Vec<Employee>, csv::Error>>()?;
        Self::checked(employees)
    }

    /// Save population to JSON file
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Load population from JSON file
    pub fn load_json(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let population: Population = serde_json::from_reader(reader)?;
        Self::checked(population.employees)
    }

    /// Reject rows that could not have come from the generator
    fn checked(employees: Vec<Employee>) -> Result<Self> {
        for employee in &employees {
            employee.validate()?;
        }
        Ok(Self { employees })
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GeneratorOptions, PopulationGenerator};

    fn population() -> Population {
        PopulationGenerator::new(GeneratorOptions::new(300, 5))
            .unwrap()
            .generate()
            .unwrap()
    }

    #[test]
    fn test_filter_by_department() {
        let pop = population();
        let it = pop.filter(&EmployeeFilter::new().department(Department::IT));
        assert!(!it.is_empty());
        assert!(it.iter().all(|e| e.department == Department::IT));
        assert_eq!(it.len(), pop.department_counts()[&Department::IT]);
    }

    #[test]
    fn test_filter_combination_can_be_empty() {
        let pop = population();
        let none = pop.filter(&EmployeeFilter::new().query("no employee is called this"));
        assert!(none.is_empty());
        assert_eq!(none.len(), 0);
        assert_eq!(none.level_counts().values().sum::<usize>(), 0);
    }

    #[test]
    fn test_query_matches_name_or_role() {
        let pop = population();
        let analysts = pop.filter(&EmployeeFilter::new().query("ANALYST"));
        assert!(analysts
            .iter()
            .all(|e| e.role.to_lowercase().contains("analyst") || e.name.to_lowercase().contains("analyst")));

        let blank = pop.filter(&EmployeeFilter::new().query("   "));
        assert_eq!(blank.len(), pop.len());
    }

    #[test]
    fn test_ranked_by_risk_descending() {
        let pop = population();
        let ranked = pop.ranked_by_risk();
        assert!(ranked.windows(2).all(|w| w[0].risk_score >= w[1].risk_score));
    }

    #[test]
    fn test_counts_cover_all_keys() {
        let pop = population();
        assert_eq!(pop.level_counts().len(), 3);
        assert_eq!(pop.department_counts().len(), 5);
        assert_eq!(pop.department_counts().values().sum::<usize>(), pop.len());
    }

    #[test]
    fn test_load_csv_rejects_invalid_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "id,name,role,department,status,stress,burnout,anxiety,workload,absenteeism,performance,risk_score,risk_level\n\
             1,Ana García,Analyst,IT,Active,9,3,3,100,10,80.0,7.5,Low\n",
        )
        .unwrap();

        match Population::load_csv(&path) {
            Err(crate::error::Error::InvalidConfig(msg)) => assert!(msg.contains("employee 1")),
            other => panic!("expected InvalidConfig, got {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_load_json_rejects_invalid_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut pop = population();
        pop.employees[0].risk_level = match pop.employees[0].risk_level {
            RiskLevel::High => RiskLevel::Low,
            _ => RiskLevel::High,
        };
        pop.save_json(&path).unwrap();

        assert!(Population::load_json(&path).is_err());
    }

    #[test]
    fn test_generated_rows_are_valid() {
        assert!(population().iter().all(|e| e.validate().is_ok()));
    }

    #[test]
    fn test_get_by_id() {
        let pop = population();
        assert_eq!(pop.get(1).map(|e| e.id), Some(1));
        assert!(pop.get(10_000).is_none());
    }
}
