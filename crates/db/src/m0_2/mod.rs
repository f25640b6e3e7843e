mod registration_search_name;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "arbe-events",
    "m0_2",
    vec_box![crate::m0_1::Migration],
    vec_box![registration_search_name::Operation]
);
