//! A small blog schema shared by the scenario tests.

/// Three posts by two authors; post 11 has no comments and a null score,
/// post 12 has a null title.
pub const FIXTURES: &str = "
    CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE posts (
        id INTEGER PRIMARY KEY,
        author_id INTEGER NOT NULL,
        title TEXT,
        score REAL
    );
    CREATE TABLE comments (
        id INTEGER PRIMARY KEY,
        post_id INTEGER NOT NULL,
        body TEXT NOT NULL
    );

    INSERT INTO authors VALUES (1, 'ana'), (2, 'bo');
    INSERT INTO posts VALUES (10, 1, 'Hello', 4.5), (11, 1, 'Again', NULL), (12, 2, NULL, 1.0);
    INSERT INTO comments VALUES (100, 10, 'first'), (101, 10, 'second'), (102, 12, 'third');
";

#[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
pub struct Comment {
    pub id: i64,
    pub body: String,
}

#[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub score: f64,
    pub author: Option<Author>,
    pub comments: Vec<Comment>,
}

pub fn author(id: i64, name: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
    }
}

pub fn comment(id: i64, body: &str) -> Comment {
    Comment {
        id,
        body: body.to_string(),
    }
}
