pub mod admin {
    pub mod handlers;
    pub mod routes;
    pub mod services;
}

pub mod comments {
    pub mod handlers;
    pub mod routes;
    pub mod services;
}

pub mod members {
    pub mod handlers;
    pub mod routes;
    pub mod services;
}

pub mod memberships {
    pub mod handlers;
    pub mod routes;
    pub mod services;
}

pub mod posts {
    pub mod handlers;
    pub mod routes;
    pub mod services;
}

pub mod schedules {
    pub mod handlers;
    pub mod routes;
    pub mod services;
}

pub mod users {
    pub mod handlers;
    pub mod routes;
    pub mod services;
}

/// Local calendar day used for derived fields such as age and validity.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
