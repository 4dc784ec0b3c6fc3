//! Employee record and its categorical attributes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::scoring::RiskLevel;

/// Inclusive range of the 1-5 ordinal attributes
const ORDINAL_RANGE: std::ops::RangeInclusive<u8> = 1..=5;
/// Inclusive range of the workload index
const WORKLOAD_RANGE: std::ops::RangeInclusive<u32> = 60..=149;
/// Inclusive range of absent days
const ABSENTEEISM_RANGE: std::ops::RangeInclusive<u32> = 0..=79;

/// Organisational unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Operations,
    Sales,
    IT,
    HR,
    Finance,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Operations,
        Department::Sales,
        Department::IT,
        Department::HR,
        Department::Finance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Operations => "Operations",
            Department::Sales => "Sales",
            Department::IT => "IT",
            Department::HR => "HR",
            Department::Finance => "Finance",
        }
    }

    /// Position in [`Department::ALL`]
    pub fn index(self) -> usize {
        match self {
            Department::Operations => 0,
            Department::Sales => 1,
            Department::IT => 2,
            Department::HR => 3,
            Department::Finance => 4,
        }
    }

    /// Job titles an employee of this department can hold
    pub fn roles(self) -> &'static [&'static str] {
        match self {
            Department::Operations => &[
                "Production Supervisor",
                "Operations Coordinator",
                "Process Analyst",
            ],
            Department::Sales => &["Sales Executive", "Commercial Consultant", "Key Account Manager"],
            Department::IT => &["Senior Developer", "Data Analyst", "Systems Engineer"],
            Department::HR => &["HR Analyst", "Business Partner", "Wellbeing Specialist"],
            Department::Finance => &["Financial Analyst", "Controller", "Financial Planner"],
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Department::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidConfig(format!("unknown department '{}'", wanted)))
    }
}

/// Employment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveStatus {
    Active,
    Inactive,
}

impl ActiveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveStatus::Active => "Active",
            ActiveStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for ActiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActiveStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ActiveStatus::Active),
            "inactive" => Ok(ActiveStatus::Inactive),
            other => Err(Error::InvalidConfig(format!("unknown status '{}'", other))),
        }
    }
}

/// One synthetic employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub department: Department,
    pub status: ActiveStatus,
    /// Self-reported stress, 1-5
    pub stress: u8,
    /// Burnout indicator, 1-5
    pub burnout: u8,
    /// Anxiety indicator, 1-5
    pub anxiety: u8,
    /// Workload index, 60-149
    pub workload: u32,
    /// Absent days, 0-79
    pub absenteeism: u32,
    pub performance: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == ActiveStatus::Active
    }

    /// Check the attribute ranges and that the level matches the score
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |what: String| -> crate::error::Result<()> {
            Err(Error::InvalidConfig(format!("employee {}: {}", self.id, what)))
        };

        for (name, value) in [
            ("stress", self.stress),
            ("burnout", self.burnout),
            ("anxiety", self.anxiety),
        ] {
            if !ORDINAL_RANGE.contains(&value) {
                return invalid(format!("{} {} outside 1-5", name, value));
            }
        }
        if !WORKLOAD_RANGE.contains(&self.workload) {
            return invalid(format!("workload {} outside 60-149", self.workload));
        }
        if !ABSENTEEISM_RANGE.contains(&self.absenteeism) {
            return invalid(format!("absenteeism {} outside 0-79", self.absenteeism));
        }
        if !(0.0..=1.0).contains(&self.risk_score) {
            return invalid(format!("risk score {} outside [0, 1]", self.risk_score));
        }
        let expected = RiskLevel::from_score(self.risk_score);
        if self.risk_level != expected {
            return invalid(format!(
                "risk level {} does not match score {} ({})",
                self.risk_level, self.risk_score, expected
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_parse() {
        assert_eq!("it".parse::<Department>().unwrap(), Department::IT);
        assert_eq!("Finance".parse::<Department>().unwrap(), Department::Finance);
        assert!("Legal".parse::<Department>().is_err());
    }

    #[test]
    fn test_department_index_matches_all() {
        for (i, dept) in Department::ALL.iter().enumerate() {
            assert_eq!(dept.index(), i);
            assert_eq!(dept.roles().len(), 3);
        }
    }

    fn employee() -> Employee {
        Employee {
            id: 7,
            name: "Ana García".to_string(),
            role: "Analyst".to_string(),
            department: Department::IT,
            status: ActiveStatus::Active,
            stress: 3,
            burnout: 4,
            anxiety: 2,
            workload: 120,
            absenteeism: 10,
            performance: 82.0,
            risk_score: 0.5,
            risk_level: RiskLevel::Medium,
        }
    }

    #[test]
    fn test_validate_accepts_consistent_row() {
        assert!(employee().validate().is_ok());
        assert!(employee().is_active());
    }

    #[test]
    fn test_validate_rejects_out_of_range_attributes() {
        let mut e = employee();
        e.stress = 9;
        assert!(matches!(e.validate(), Err(Error::InvalidConfig(msg)) if msg.contains("employee 7")));

        let mut e = employee();
        e.workload = 150;
        assert!(e.validate().is_err());

        let mut e = employee();
        e.absenteeism = 80;
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inconsistent_score() {
        let mut e = employee();
        e.risk_score = 7.5;
        e.risk_level = RiskLevel::High;
        assert!(e.validate().is_err());

        let mut e = employee();
        e.risk_score = f64::NAN;
        assert!(e.validate().is_err());

        let mut e = employee();
        e.risk_level = RiskLevel::Low;
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("INACTIVE".parse::<ActiveStatus>().unwrap(), ActiveStatus::Inactive);
        assert!("retired".parse::<ActiveStatus>().is_err());
    }
}
