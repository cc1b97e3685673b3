use crate::client::CanvasClient;
use crate::models::{Enrollment, Student};
use crate::pagination::Pages;

impl CanvasClient {
    /// Students of a course, in the order the server lists them.
    ///
    /// Pages are fetched lazily as the iterator advances.
    #[must_use]
    pub fn get_students(&self, course_id: u64) -> Pages<'_, Student> {
        let id = course_id.to_string();
        Pages::new(
            self,
            self.endpoint(&["api", "v1", "courses", &id, "users"]),
            &[("enrollment_type", "student")],
        )
    }

    /// All enrollments of a course, any role.
    #[must_use]
    pub fn get_enrollments(&self, course_id: u64) -> Pages<'_, Enrollment> {
        let id = course_id.to_string();
        Pages::new(
            self,
            self.endpoint(&["api", "v1", "courses", &id, "enrollments"]),
            &[],
        )
    }
}
