use std::collections::HashSet;
use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{CategoryScores, Coordinate, EnrichedArticle};
use crate::storage::ArticleRepository;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_db()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                link TEXT UNIQUE NOT NULL,
                pub_date TEXT,
                description TEXT,
                summary TEXT,
                category_scores TEXT,
                dominant_category TEXT NOT NULL,
                locations TEXT,
                lat REAL,
                lon REAL,
                overall_risk_score REAL NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_articles_dominant_category ON articles(dominant_category);
            "#,
        )?;

        Ok(())
    }

    fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<EnrichedArticle> {
        let scores_json: Option<String> = row.get(4)?;
        let locations_json: Option<String> = row.get(5)?;
        let lat: Option<f64> = row.get(6)?;
        let lon: Option<f64> = row.get(7)?;

        // Tolerate malformed stored JSON rather than failing the query.
        let category_scores: CategoryScores = scores_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();
        let locations: Vec<String> = locations_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();

        Ok(EnrichedArticle {
            title: row.get(0)?,
            link: row.get(1)?,
            pub_date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            summary: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            category_scores,
            locations,
            coordinate: match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }),
                _ => None,
            },
            overall_risk_score: row.get(9)?,
        })
    }
}

const SELECT_COLUMNS: &str = "title, link, pub_date, description, category_scores, \
                              locations, lat, lon, summary, overall_risk_score";

impl ArticleRepository for SqliteStore {
    fn known_links(&self) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT link FROM articles")?;
        let links = stmt.query_map([], |row| row.get(0))?;
        links
            .collect::<std::result::Result<HashSet<_>, _>>()
            .map_err(Into::into)
    }

    fn upsert(&self, article: &EnrichedArticle) -> Result<()> {
        let scores_json = serde_json::to_string(&article.category_scores)?;
        let locations_json = serde_json::to_string(&article.locations)?;
        // Recomputed from the scores on every write, never trusted from a
        // prior row.
        let dominant = article.dominant_category();

        self.conn.execute(
            r#"
            INSERT INTO articles
                (title, link, pub_date, description, summary, category_scores,
                 dominant_category, locations, lat, lon, overall_risk_score)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(link) DO UPDATE SET
                title = excluded.title,
                pub_date = excluded.pub_date,
                description = excluded.description,
                summary = excluded.summary,
                category_scores = excluded.category_scores,
                dominant_category = excluded.dominant_category,
                locations = excluded.locations,
                lat = excluded.lat,
                lon = excluded.lon,
                overall_risk_score = excluded.overall_risk_score
            "#,
            params![
                article.title,
                article.link,
                article.pub_date,
                article.description,
                article.summary,
                scores_json,
                dominant,
                locations_json,
                article.coordinate.map(|c| c.lat),
                article.coordinate.map(|c| c.lon),
                article.overall_risk_score,
            ],
        )?;

        Ok(())
    }

    fn query(
        &self,
        categories: Option<&HashSet<String>>,
        min_risk: f32,
    ) -> Result<Vec<EnrichedArticle>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM articles WHERE overall_risk_score >= ?1",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![min_risk], Self::row_to_article)?;
        let mut articles = rows
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|a| match categories {
                Some(filter) => filter.contains(a.dominant_category()),
                None => true,
            })
            .collect::<Vec<_>>();

        // Publication dates come from feeds as free-form strings, so the
        // ordering is done here after lenient parsing. Unparseable dates
        // sort last.
        articles.sort_by_key(|a| match a.published_at() {
            Some(dt) => (0, dt.timestamp(), a.link.clone()),
            None => (1, 0, a.link.clone()),
        });

        Ok(articles)
    }

    fn distinct_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT dominant_category FROM articles \
             WHERE dominant_category != 'Unknown' ORDER BY dominant_category",
        )?;
        let categories = stmt.query_map([], |row| row.get(0))?;
        categories
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}
