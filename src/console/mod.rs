//! Interactive numbered menu over the library services

pub mod prompt;
pub mod render;

use std::{fmt, sync::Arc};

use chrono::Local;
use inquire::{InquireError, Select};

use crate::{
    error::AppError,
    models::{BookFilter, BookPatch, BookStatus, LoanFilter, NewBook, NewCategory, NewLoan},
    services::Services,
};

/// Failure of a single menu action
#[derive(Debug, thiserror::Error)]
enum ActionError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Prompt(#[from] InquireError),
}

type ActionResult = Result<(), ActionError>;

/// Menu entries, numbered as displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    ListBooks,
    SearchBooks,
    UpdateBook,
    DeleteBook,
    ListCategories,
    AddCategory,
    LendBook,
    ReturnBook,
    ListLoans,
    Statistics,
    Exit,
}

impl MenuChoice {
    /// Display order; `Exit` is listed last as option 0.
    pub const ALL: [MenuChoice; 12] = [
        MenuChoice::AddBook,
        MenuChoice::ListBooks,
        MenuChoice::SearchBooks,
        MenuChoice::UpdateBook,
        MenuChoice::DeleteBook,
        MenuChoice::ListCategories,
        MenuChoice::AddCategory,
        MenuChoice::LendBook,
        MenuChoice::ReturnBook,
        MenuChoice::ListLoans,
        MenuChoice::Statistics,
        MenuChoice::Exit,
    ];

    pub fn number(&self) -> u8 {
        match self {
            MenuChoice::Exit => 0,
            other => {
                let position = Self::ALL.iter().position(|c| c == other).unwrap_or(0);
                (position + 1) as u8
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddBook => "Add book",
            MenuChoice::ListBooks => "List books",
            MenuChoice::SearchBooks => "Search books",
            MenuChoice::UpdateBook => "Update book",
            MenuChoice::DeleteBook => "Delete book",
            MenuChoice::ListCategories => "List categories",
            MenuChoice::AddCategory => "Add category",
            MenuChoice::LendBook => "Lend book",
            MenuChoice::ReturnBook => "Return book",
            MenuChoice::ListLoans => "List loans",
            MenuChoice::Statistics => "Statistics",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let number: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|c| c.number() == number)
    }
}

/// Menu text as shown before each prompt
pub fn menu() -> String {
    let mut out = render::heading("HOME LIBRARY");
    for choice in MenuChoice::ALL {
        out.push_str(&format!("\n{:>3}. {}", choice.number(), choice.label()));
    }
    out
}

/// Book list sub-menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BookView {
    All,
    Available,
    Loaned,
    ByCategory,
}

impl BookView {
    const ALL: [BookView; 4] = [
        BookView::All,
        BookView::Available,
        BookView::Loaned,
        BookView::ByCategory,
    ];
}

impl fmt::Display for BookView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookView::All => "All books",
            BookView::Available => "Available books",
            BookView::Loaned => "Loaned books",
            BookView::ByCategory => "Books in a category",
        })
    }
}

/// Loan list sub-menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoanView(LoanFilter);

impl LoanView {
    const ALL: [LoanView; 4] = [
        LoanView(LoanFilter::All),
        LoanView(LoanFilter::Active),
        LoanView(LoanFilter::Returned),
        LoanView(LoanFilter::Overdue),
    ];
}

impl fmt::Display for LoanView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            LoanFilter::All => "All loans",
            LoanFilter::Active => "Active loans",
            LoanFilter::Returned => "Returned loans",
            LoanFilter::Overdue => "Overdue loans",
        })
    }
}

fn status_help() -> String {
    let names: Vec<&str> = BookStatus::ALL.iter().map(|s| s.as_str()).collect();
    format!("One of {}, leave blank to keep", names.join(", "))
}

/// Interactive console session
pub struct Console {
    services: Arc<Services>,
}

impl Console {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    /// Run the menu until the user exits or interrupts.
    pub async fn run(&self) -> anyhow::Result<()> {
        loop {
            println!("{}", menu());

            let input = match prompt::line("Choose an option:") {
                Ok(input) => input,
                Err(InquireError::OperationCanceled) => continue,
                Err(InquireError::OperationInterrupted) => break,
                Err(e) => return Err(e.into()),
            };

            let Some(choice) = MenuChoice::parse(&input) else {
                println!("Invalid option '{}'. Enter a number between 0 and 11.", input);
                continue;
            };

            if choice == MenuChoice::Exit {
                break;
            }

            match self.dispatch(choice).await {
                Ok(()) => {}
                Err(ActionError::App(e)) => e.report(choice.label()),
                Err(ActionError::Prompt(InquireError::OperationCanceled)) => {
                    println!("{} cancelled", choice.label());
                }
                Err(ActionError::Prompt(InquireError::OperationInterrupted)) => break,
                Err(ActionError::Prompt(e)) => return Err(e.into()),
            }

            if let Err(InquireError::OperationInterrupted) = prompt::pause() {
                break;
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn dispatch(&self, choice: MenuChoice) -> ActionResult {
        println!("{}", render::heading(choice.label()));

        match choice {
            MenuChoice::AddBook => self.add_book().await,
            MenuChoice::ListBooks => self.list_books().await,
            MenuChoice::SearchBooks => self.search_books().await,
            MenuChoice::UpdateBook => self.update_book().await,
            MenuChoice::DeleteBook => self.delete_book().await,
            MenuChoice::ListCategories => self.list_categories().await,
            MenuChoice::AddCategory => self.add_category().await,
            MenuChoice::LendBook => self.lend_book().await,
            MenuChoice::ReturnBook => self.return_book().await,
            MenuChoice::ListLoans => self.list_loans().await,
            MenuChoice::Statistics => self.statistics().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Print the categories so ids can be picked from them
    async fn show_categories(&self) -> ActionResult {
        let categories = self.services.catalog.list_categories().await?;
        if !categories.is_empty() {
            println!("{}", render::categories(&categories));
        }
        Ok(())
    }

    async fn add_book(&self) -> ActionResult {
        let mut book = NewBook::new(
            prompt::required_text("Title:")?,
            prompt::required_text("Author:")?,
        );
        book.isbn = prompt::optional_text("ISBN:")?;
        book.publisher = prompt::optional_text("Publisher:")?;
        book.publication_year = prompt::optional_value("Publication year:", "e.g. 1965, leave blank to skip")?;

        self.show_categories().await?;
        book.category_id = prompt::optional_id("Category id:")?;
        book.pages = prompt::optional_value("Pages:", "Leave blank to skip")?;
        book.location = prompt::optional_text("Location:")?;
        book.notes = prompt::optional_text("Notes:")?;

        let id = self.services.catalog.add_book(book).await?;
        println!("Book added with id {}", id);
        Ok(())
    }

    async fn list_books(&self) -> ActionResult {
        let view = Select::new("Which books?", BookView::ALL.to_vec()).prompt()?;

        let filter = match view {
            BookView::All => BookFilter::default(),
            BookView::Available => BookFilter::status(BookStatus::Available),
            BookView::Loaned => BookFilter::status(BookStatus::Loaned),
            BookView::ByCategory => {
                self.show_categories().await?;
                BookFilter::category(prompt::required_id("Category id:")?)
            }
        };

        let books = self.services.catalog.list_books(filter).await?;
        println!("{}", render::books(&books));
        Ok(())
    }

    async fn search_books(&self) -> ActionResult {
        let term = prompt::required_text("Title, author or ISBN contains:")?;
        let books = self.services.catalog.search_books(&term).await?;
        println!("{}", render::books(&books));
        Ok(())
    }

    async fn update_book(&self) -> ActionResult {
        let id = prompt::required_id("Book id:")?;
        let current = self.services.catalog.get_book(id).await?;
        println!("{}", render::books(std::slice::from_ref(&current)));
        println!("Leave a field blank to keep its current value.");

        let patch = BookPatch {
            title: prompt::optional_text("Title:")?,
            author: prompt::optional_text("Author:")?,
            isbn: prompt::optional_text("ISBN:")?,
            publisher: prompt::optional_text("Publisher:")?,
            publication_year: prompt::optional_value("Publication year:", "Leave blank to keep")?,
            category_id: prompt::optional_id("Category id:")?,
            pages: prompt::optional_value("Pages:", "Leave blank to keep")?,
            status: prompt::optional_value("Status:", &status_help())?,
            location: prompt::optional_text("Location:")?,
            notes: prompt::optional_text("Notes:")?,
        };

        self.services.catalog.update_book(id, patch).await?;
        println!("Book {} updated", id);
        Ok(())
    }

    async fn delete_book(&self) -> ActionResult {
        let id = prompt::required_id("Book id:")?;
        let book = self.services.catalog.get_book(id).await?;

        let question = format!("Delete '{}' by {} and all of its loans?", book.title, book.author);
        if !prompt::confirm(&question)? {
            println!("Nothing deleted");
            return Ok(());
        }

        let title = self.services.catalog.delete_book(id).await?;
        println!("Book '{}' deleted", title);
        Ok(())
    }

    async fn list_categories(&self) -> ActionResult {
        let categories = self.services.catalog.list_categories().await?;
        println!("{}", render::categories(&categories));
        Ok(())
    }

    async fn add_category(&self) -> ActionResult {
        let category = NewCategory::new(
            prompt::required_text("Name:")?,
            prompt::optional_text("Description:")?,
        );

        let id = self.services.catalog.add_category(category).await?;
        println!("Category added with id {}", id);
        Ok(())
    }

    async fn lend_book(&self) -> ActionResult {
        let available = self
            .services
            .catalog
            .list_books(BookFilter::status(BookStatus::Available))
            .await?;
        if available.is_empty() {
            println!("No books are available to lend.");
            return Ok(());
        }
        println!("{}", render::books(&available));

        let mut loan = NewLoan::new(
            prompt::required_id("Book id:")?,
            prompt::required_text("Borrower:")?,
        );
        loan.expected_return_date = prompt::optional_date("Expected return date:")?;
        loan.notes = prompt::optional_text("Notes:")?;

        let loan_id = self.services.loans.lend_book(loan).await?;
        println!("Loan {} registered", loan_id);
        Ok(())
    }

    async fn return_book(&self) -> ActionResult {
        let active = self.services.loans.list_loans(LoanFilter::Active).await?;
        if active.is_empty() {
            println!("No books are currently lent out.");
            return Ok(());
        }
        println!("{}", render::loans(&active, Local::now().date_naive()));

        let book_id = prompt::required_id("Book id:")?;
        let loan_id = prompt::optional_id("Loan id:")?;

        let closed = self.services.loans.return_book(book_id, loan_id).await?;
        println!("Loan {} closed, book {} is available again", closed, book_id);
        Ok(())
    }

    async fn list_loans(&self) -> ActionResult {
        let view = Select::new("Which loans?", LoanView::ALL.to_vec()).prompt()?;
        let loans = self.services.loans.list_loans(view.0).await?;
        println!("{}", render::loans(&loans, Local::now().date_naive()));
        Ok(())
    }

    async fn statistics(&self) -> ActionResult {
        let stats = self.services.stats.get_stats().await?;
        println!("{}", render::stats(&stats));
        Ok(())
    }
}
