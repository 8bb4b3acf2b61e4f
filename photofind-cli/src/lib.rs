pub use crate::app::PhotoFindCli;

mod app {
    use anyhow::Result;
    use photofind_core::{Image, PhotoApi, SearchSession};
    use std::io::{BufRead, Write};

    pub struct PhotoFindCli<A: PhotoApi> {
        api: A,
        session: SearchSession,
    }

    impl<A: PhotoApi> PhotoFindCli<A> {
        pub fn new(api: A) -> Self {
            Self {
                api,
                session: SearchSession::new(),
            }
        }

        pub fn session(&self) -> &SearchSession {
            &self.session
        }

        /// Runs a new search and prints its first page. Returns `false` if
        /// nothing was fetched or the fetch failed.
        pub fn search<W: Write>(&mut self, query: &str, out: &mut W) -> Result<bool> {
            let Some(request) = self.session.submit_search(query) else {
                writeln!(out, "Type something to search...")?;
                return Ok(false);
            };
            self.session.run(&self.api, request);
            self.report(0, out)
        }

        /// Fetches the next page and prints only the images it added.
        pub fn load_more<W: Write>(&mut self, out: &mut W) -> Result<bool> {
            let shown = self.session.state().images.len();
            let Some(request) = self.session.load_more() else {
                writeln!(out, "No more pages to load.")?;
                return Ok(false);
            };
            self.session.run(&self.api, request);
            self.report(shown, out)
        }

        /// Fetches one random image. An older error stays on the menu, so
        /// success is read from the image list rather than the message.
        pub fn random<W: Write>(&mut self, out: &mut W) -> Result<bool> {
            let revision = self.session.state().images_revision;
            let request = self.session.fetch_random();
            self.session.run(&self.api, request);

            let state = self.session.state();
            if state.images_revision == revision {
                writeln!(out, "{}", state.error_message)?;
                return Ok(false);
            }
            print_images(&state.images, 0, out)?;
            Ok(true)
        }

        pub fn list<W: Write>(&self, out: &mut W) -> Result<()> {
            let images = &self.session.state().images;
            if images.is_empty() {
                writeln!(out, "(no images)")?;
            }
            print_images(images, 0, out)
        }

        fn report<W: Write>(&self, from: usize, out: &mut W) -> Result<bool> {
            let state = self.session.state();
            if state.has_error() {
                writeln!(out, "{}", state.error_message)?;
                return Ok(false);
            }
            if state.images.is_empty() {
                writeln!(out, "No images found.")?;
            }
            print_images(&state.images, from, out)?;
            Ok(true)
        }

        fn show_menu<W: Write>(&self, out: &mut W) -> Result<()> {
            let state = self.session.state();
            let query = if state.query_text.is_empty() {
                "(none)".to_string()
            } else {
                format!("\"{}\"", state.query_text)
            };

            writeln!(out, "\n=== PhotoFind - Image Search ===")?;
            writeln!(
                out,
                "Query: {} | Page {}/{} | Images: {}",
                query,
                state.page,
                state.total_pages,
                state.images.len()
            )?;
            if state.has_error() {
                writeln!(out, "! {}", state.error_message)?;
            }
            writeln!(out)?;
            writeln!(out, "1. New search")?;
            if state.can_load_more() {
                writeln!(out, "2. Load more")?;
            }
            writeln!(out, "3. Random image")?;
            writeln!(out, "4. List images")?;
            writeln!(out, "5. Exit")?;
            write!(out, "\nSelect an option: ")?;
            out.flush()?;
            Ok(())
        }

        /// Interactive menu loop. Ends on "5" or end of input.
        pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
            loop {
                self.show_menu(&mut out)?;

                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    writeln!(out)?;
                    break;
                }

                match line.trim() {
                    "1" => {
                        write!(out, "Search for: ")?;
                        out.flush()?;
                        let mut query = String::new();
                        if input.read_line(&mut query)? == 0 {
                            break;
                        }
                        self.search(&query, &mut out)?;
                    }
                    "2" if self.session.state().can_load_more() => {
                        self.load_more(&mut out)?;
                    }
                    "3" => {
                        self.random(&mut out)?;
                    }
                    "4" => {
                        self.list(&mut out)?;
                    }
                    "5" => {
                        writeln!(out, "Exiting PhotoFind...")?;
                        break;
                    }
                    _ => {
                        writeln!(out, "Invalid option.")?;
                    }
                }
            }

            Ok(())
        }
    }

    pub(crate) fn format_image(index: usize, image: &Image) -> String {
        let mut line = format!("{:>3}. {}  {}", index + 1, image.id, image.thumbnail_url());
        let alt = image.alt_text();
        if !alt.is_empty() {
            line.push_str(&format!("  \"{}\"", alt));
        }
        if let Some(name) = image.photographer() {
            line.push_str(&format!("  by {}", name));
        }
        line
    }

    fn print_images<W: Write>(images: &[Image], from: usize, out: &mut W) -> Result<()> {
        for (index, image) in images.iter().enumerate().skip(from) {
            writeln!(out, "{}", format_image(index, image))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::app::format_image;
    use super::PhotoFindCli;
    use photofind_core::{FetchError, Image, ImageUrls, PhotoApi, Photographer, SearchPage};
    use std::io::Cursor;

    struct StaticApi {
        total_pages: u32,
        fail_search: bool,
        fail_random: bool,
    }

    impl StaticApi {
        fn working(total_pages: u32) -> Self {
            Self {
                total_pages,
                fail_search: false,
                fail_random: false,
            }
        }
    }

    fn image(id: &str) -> Image {
        Image {
            id: id.to_string(),
            urls: ImageUrls {
                small: format!("http://img/{}", id),
                regular: None,
            },
            ..Default::default()
        }
    }

    impl PhotoApi for StaticApi {
        fn search_photos(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
            if self.fail_search {
                return Err(FetchError::MissingApiKey);
            }
            Ok(SearchPage {
                results: vec![image(&format!("{}-{}", query, page))],
                total_pages: self.total_pages,
                total: None,
            })
        }

        fn random_photo(&self) -> Result<Image, FetchError> {
            if self.fail_random {
                return Err(FetchError::MissingApiKey);
            }
            Ok(image("random"))
        }
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_image() {
        let mut img = image("abc");
        assert_eq!(format_image(0, &img), "  1. abc  http://img/abc");

        img.alt_description = Some("a red fox".to_string());
        img.user = Some(Photographer {
            name: Some("Ann".to_string()),
        });
        assert_eq!(
            format_image(9, &img),
            " 10. abc  http://img/abc  \"a red fox\"  by Ann"
        );
    }

    #[test]
    fn test_load_more_prints_only_new_images() {
        let mut cli = PhotoFindCli::new(StaticApi::working(2));
        let mut out = Vec::new();
        assert!(cli.search("cats", &mut out).unwrap());
        assert!(cli.load_more(&mut out).unwrap());
        assert!(!cli.load_more(&mut out).unwrap());

        let text = output(out);
        assert_eq!(text.matches("  1. cats-1").count(), 1);
        assert!(text.contains("  2. cats-2"));
        assert!(text.contains("No more pages to load."));
    }

    #[test]
    fn test_failure_prints_user_message() {
        let mut cli = PhotoFindCli::new(StaticApi {
            total_pages: 1,
            fail_search: true,
            fail_random: true,
        });
        let mut out = Vec::new();
        assert!(!cli.search("cats", &mut out).unwrap());
        assert!(!cli.random(&mut out).unwrap());

        let text = output(out);
        assert!(text.contains("Error fetching images. Try again later."));
        assert!(text.contains("Error fetching random image. Try again later."));
        assert!(!cli.session().state().loading);
    }

    #[test]
    fn test_random_succeeds_under_an_old_search_error() {
        let mut cli = PhotoFindCli::new(StaticApi {
            total_pages: 1,
            fail_search: true,
            fail_random: false,
        });
        let mut out = Vec::new();
        assert!(!cli.search("cats", &mut out).unwrap());
        assert!(cli.random(&mut out).unwrap());

        let text = output(out);
        assert!(text.contains("  1. random"));
        let state = cli.session().state();
        assert_eq!(state.images.len(), 1);
        assert_eq!(state.error_message, "Error fetching images. Try again later.");
    }

    #[test]
    fn test_menu_session() {
        let mut cli = PhotoFindCli::new(StaticApi::working(3));
        let input = Cursor::new("1\ncats\n2\n3\n2\n4\n5\n");
        let mut out = Vec::new();
        cli.run(input, &mut out).unwrap();

        let text = output(out);
        assert!(text.contains("Query: \"cats\" | Page 1/3 | Images: 1"));
        assert!(text.contains("2. Load more"));
        assert!(text.contains("  2. cats-2"));
        // After the random image the load-more option disappears.
        assert!(text.contains("Invalid option."));
        assert!(text.contains("  1. random"));
        assert!(text.contains("Exiting PhotoFind..."));
        assert_eq!(cli.session().state().images.len(), 1);
    }

    #[test]
    fn test_menu_stops_at_end_of_input() {
        let mut cli = PhotoFindCli::new(StaticApi::working(1));
        let mut out = Vec::new();
        cli.run(Cursor::new("4\n"), &mut out).unwrap();
        assert!(output(out).contains("(no images)"));
    }
}
