pub mod add_student;
pub mod record;
pub mod student_detail;
pub mod students;
