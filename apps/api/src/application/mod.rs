pub mod file_damage_report;
